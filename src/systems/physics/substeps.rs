/// How many fixed sub-steps to run this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepPlan {
    pub sub_steps: u32,
    pub dropped_time: f64,
}

/// Fixed-step accumulator with a hard cap per call.
///
/// Leftover time below one fixed step carries to the next frame. Time beyond
/// `max_sub_steps * fixed_dt` is discarded so a stalled display never makes
/// the simulation try to catch up.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubStepper {
    accumulator: f64,
}

impl SubStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn plan(&mut self, fixed_dt: f32, actual_dt: f64, max_sub_steps: u32) -> StepPlan {
        let fixed = fixed_dt as f64;
        if !(fixed.is_finite() && fixed > 0.0) {
            log::warn!("ignoring step with invalid fixed dt {}", fixed_dt);
            return StepPlan::default();
        }

        let actual = if actual_dt.is_finite() && actual_dt > 0.0 {
            actual_dt
        } else {
            0.0
        };
        self.accumulator += actual;

        let mut sub_steps = 0u32;
        while self.accumulator >= fixed && sub_steps < max_sub_steps {
            self.accumulator -= fixed;
            sub_steps += 1;
        }

        let mut dropped_time = 0.0;
        if self.accumulator >= fixed {
            let kept = self.accumulator % fixed;
            dropped_time = self.accumulator - kept;
            self.accumulator = kept;
        }

        StepPlan {
            sub_steps,
            dropped_time,
        }
    }
}
