//! FixedStepClock - turns raw time samples into (elapsed, delta) pairs.
//!
//! State is monotonic: a sample that goes backwards (or is not finite) is
//! clamped to the previous elapsed time, producing a zero delta. The render
//! loop keeps running either way.

mod source;

pub use source::{HostClock, TimeSource, WallClock};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockTick {
    pub elapsed: f64,
    pub delta: f64,
}

pub struct FixedStepClock<S: TimeSource> {
    source: S,
    previous_elapsed: f64,
    rejected_samples: u32,
}

impl<S: TimeSource> FixedStepClock<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            previous_elapsed: 0.0,
            rejected_samples: 0,
        }
    }

    /// Seconds since program start, as reported by the source.
    pub fn sample(&mut self) -> f64 {
        self.source.now_seconds()
    }

    pub fn tick(&mut self) -> ClockTick {
        let raw = self.sample();
        if !raw.is_finite() || raw < self.previous_elapsed {
            self.rejected_samples = self.rejected_samples.saturating_add(1);
            log::warn!(
                "clock went backwards or is invalid ({} < {}), clamping delta to 0",
                raw,
                self.previous_elapsed
            );
            return ClockTick {
                elapsed: self.previous_elapsed,
                delta: 0.0,
            };
        }

        let delta = raw - self.previous_elapsed;
        self.previous_elapsed = raw;
        ClockTick {
            elapsed: raw,
            delta,
        }
    }

    pub fn previous_elapsed(&self) -> f64 {
        self.previous_elapsed
    }

    /// Number of samples clamped so far.
    pub fn rejected_samples(&self) -> u32 {
        self.rejected_samples
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}
