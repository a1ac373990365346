//! `log` facade bridged to the browser console.
//!
//! Native builds (tests, tooling) never install a logger, so the macros are
//! no-ops there and nothing touches `web_sys`.

use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct ConsoleLogger {
    level: Level,
}

static LOGGER: ConsoleLogger = ConsoleLogger { level: Level::Info };

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.target(), record.args());
        write_console(record.level(), &line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let msg = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&msg),
        Level::Warn => web_sys::console::warn_1(&msg),
        Level::Info => web_sys::console::info_1(&msg),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, _line: &str) {}

/// Install the console logger once. Later calls are ignored.
pub fn init_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}
