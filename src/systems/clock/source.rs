#[cfg(target_arch = "wasm32")]
use js_sys;

/// Anything that can report seconds since some fixed origin.
pub trait TimeSource {
    fn now_seconds(&mut self) -> f64;
}

/// Real clock measured from its own creation.
pub struct WallClock {
    #[cfg(target_arch = "wasm32")]
    start_ms: f64,
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
}

impl WallClock {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            WallClock { start_ms: js_sys::Date::now() }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            WallClock { start: std::time::Instant::now() }
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn now_seconds(&mut self) -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            (js_sys::Date::now() - self.start_ms) / 1000.0
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.start.elapsed().as_secs_f64()
        }
    }
}

/// Clock driven by the host: the browser passes the rAF timestamp each frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostClock {
    now: f64,
}

impl HostClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_seconds(&mut self, seconds: f64) {
        self.now = seconds;
    }

    pub fn set_millis(&mut self, millis: f64) {
        self.now = millis / 1000.0;
    }
}

impl TimeSource for HostClock {
    fn now_seconds(&mut self) -> f64 {
        self.now
    }
}
