use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::systems::clock::{TimeSource, WallClock};
use crate::systems::physics::PhysicsWorld;

use super::SimulationCore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// No frame has run yet.
    Idle,
    /// Steady per-frame loop.
    Running,
    /// Stop was requested; frames are no-ops until `resume`.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame ran; the host should schedule the next one.
    Continue,
    /// Stop signal observed; do not schedule again.
    Stopped,
}

/// Cloneable stop flag, checked at the top of every frame.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Per-frame orchestration:
/// deferred commands -> clock -> world step (+impacts) -> sync -> render handoff.
///
/// Cadence belongs to the host display loop; the driver never throttles.
pub struct AnimationDriver {
    state: DriverState,
    stop: StopHandle,
    frames: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            stop: StopHandle::new(),
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Leave `Stopped`. The next frame picks up from the current clock sample.
    pub fn resume(&mut self) {
        self.stop.clear();
        if self.state == DriverState::Stopped {
            self.state = DriverState::Running;
        }
    }

    pub fn frame<W: PhysicsWorld, S: TimeSource>(
        &mut self,
        sim: &mut SimulationCore<W, S>,
    ) -> FrameOutcome {
        if self.stop.is_stop_requested() {
            if self.state != DriverState::Stopped {
                log::info!("animation driver stopped after {} frames", self.frames);
            }
            self.state = DriverState::Stopped;
            return FrameOutcome::Stopped;
        }
        self.state = DriverState::Running;

        let mut timer = WallClock::new();
        sim.stats.reset();
        // Cues the host did not take last frame are stale: playback never waits.
        sim.impacts.queue_mut().clear();

        // Frame boundary: nothing is mid-step, so queued mutations are safe.
        sim.stats.deferred_applied = sim.apply_deferred() as u32;

        let tick = sim.tick_clock();
        sim.stats.elapsed = tick.elapsed;
        sim.stats.delta = tick.delta;

        let (report, collisions, cues) = sim.step_world(tick.delta);
        sim.stats.sub_steps = report.sub_steps;
        sim.stats.dropped_time = report.dropped_time;
        sim.stats.collisions = collisions as u32;
        sim.stats.cues = cues as u32;
        sim.stats.cues_dropped = sim.impacts.queue().dropped();

        sim.stats.synced_objects = sim.sync_objects() as u32;

        sim.extract_render();

        sim.stats.dynamic_bodies = sim.world.dynamic_body_count() as u32;
        sim.stats.frame_ms = timer.now_seconds() * 1000.0;
        sim.frame += 1;
        self.frames += 1;

        FrameOutcome::Continue
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}
