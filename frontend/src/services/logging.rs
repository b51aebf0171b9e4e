use gloo::net::http::Request;
use log::{Level, LevelFilter, Metadata, Record};
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;

const LOG_ENDPOINT: &str = "http://localhost:3000/api/logs";

#[derive(Debug, Serialize)]
struct LogRequest {
    level: &'static str,
    message: String,
    component: Option<String>,
}

/// Forwards frontend log lines to the backend log sink
pub struct Logger;

impl Logger {
    pub fn debug_with_component(component: &str, message: &str) {
        Self::log("debug", message, Some(component));
    }

    pub fn info_with_component(component: &str, message: &str) {
        Self::log("info", message, Some(component));
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log("warn", message, Some(component));
    }

    pub fn error_with_component(component: &str, message: &str) {
        gloo::console::error!(format!("[{}] {}", component, message));
        Self::log("error", message, Some(component));
    }

    fn log(level: &'static str, message: &str, component: Option<&str>) {
        let request = LogRequest {
            level,
            message: message.to_string(),
            component: component.map(str::to_string),
        };

        // Fire and forget; a missing log sink must never affect the form
        spawn_local(async move {
            if let Ok(builder) = Request::post(LOG_ENDPOINT).json(&request) {
                let _ = builder.send().await;
            }
        });
    }
}

/// Bridges `log` records emitted by the entry engine into [`Logger`]
struct EngineLogBridge;

static ENGINE_LOG_BRIDGE: EngineLogBridge = EngineLogBridge;

impl log::Log for EngineLogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        let component = record.target();
        match record.level() {
            Level::Error => Logger::error_with_component(component, &message),
            Level::Warn => Logger::warn_with_component(component, &message),
            Level::Info => Logger::info_with_component(component, &message),
            Level::Debug | Level::Trace => Logger::debug_with_component(component, &message),
        }
    }

    fn flush(&self) {}
}

/// Installs the engine log bridge; later calls are no-ops
pub fn init_engine_logging() {
    if log::set_logger(&ENGINE_LOG_BRIDGE).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}
