pub mod use_preview_refresh;
pub mod use_result_form;
