//! Reads the edit-mode seed data the server embeds in the page.
//!
//! The result page may define two globals before the app boots:
//! `window.prizeEntriesData` (tier key to persisted rows) and
//! `window.lotteryResultDraw` (the draw information of the result).

use engine::ResultForm;
use serde::de::DeserializeOwned;
use shared::{Draw, PrizeEntriesData};
use wasm_bindgen::JsValue;

use crate::services::logging::Logger;

const PRIZE_ENTRIES_GLOBAL: &str = "prizeEntriesData";
const DRAW_GLOBAL: &str = "lotteryResultDraw";

fn read_global<T: DeserializeOwned>(name: &str) -> Option<T> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    let json: String = js_sys::JSON::stringify(&value).ok()?.into();
    match serde_json::from_str(&json) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            Logger::error_with_component("hydration", &format!("Ignoring malformed {}: {}", name, e));
            None
        }
    }
}

/// Builds the initial form: edit mode when the page carries persisted rows
pub fn initial_form() -> ResultForm {
    match read_global::<PrizeEntriesData>(PRIZE_ENTRIES_GLOBAL) {
        Some(prizes) => {
            let draw = read_global::<Draw>(DRAW_GLOBAL).unwrap_or_default();
            Logger::info_with_component(
                "hydration",
                &format!("Hydrating result {:?} from page data", draw.result_id),
            );
            ResultForm::edit(draw, prizes)
        }
        None => ResultForm::create(),
    }
}

/// `result_id` query parameter of the current page, if any
pub fn result_id_from_location() -> Option<i64> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get("result_id")?.parse().ok()
}
