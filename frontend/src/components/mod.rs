pub mod bulk_entry_panel;
pub mod draw_info_form;
pub mod notifications;
pub mod preview_panel;
pub mod tier_section;
