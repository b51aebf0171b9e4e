use std::cell::Cell;
use std::rc::Rc;

use engine::PreviewConfig;
use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::logging::Logger;

/// Result from the preview refresh hook
pub struct UsePreviewRefreshResult {
    pub is_running: bool,
}

/// Periodically re-runs `refresh_fn` while the preview panel is visible.
///
/// The loop is armed when `visible` becomes true and disarmed by the effect
/// cleanup when it turns false or the component unmounts. Unchanged previews
/// are filtered out downstream by the preview gate.
#[hook]
pub fn use_preview_refresh(config: PreviewConfig, refresh_fn: Callback<()>, visible: bool) -> UsePreviewRefreshResult {
    let is_running = use_state(|| false);

    {
        let is_running = is_running.clone();
        use_effect_with((config, visible), move |(config, visible)| {
            let armed = Rc::new(Cell::new(*visible));
            is_running.set(*visible);

            if *visible {
                Logger::debug_with_component(
                    "preview-refresh-hook",
                    &format!("Preview refresh armed every {}ms", config.refresh_interval_ms),
                );
                let armed = armed.clone();
                let interval_ms = config.refresh_interval_ms;
                spawn_local(async move {
                    loop {
                        TimeoutFuture::new(interval_ms).await;
                        if !armed.get() {
                            break;
                        }
                        refresh_fn.emit(());
                    }
                });
            }

            move || armed.set(false)
        });
    }

    UsePreviewRefreshResult {
        is_running: *is_running,
    }
}
