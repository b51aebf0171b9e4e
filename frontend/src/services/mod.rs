pub mod api;
pub mod hydration;
pub mod logging;
