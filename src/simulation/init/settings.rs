use crate::systems::clock::TimeSource;
use crate::systems::physics::PhysicsWorld;

use super::SimulationCore;

pub(super) fn set_impact_threshold<W: PhysicsWorld, S: TimeSource>(
    sim: &mut SimulationCore<W, S>,
    threshold: f32,
) {
    if !threshold.is_finite() {
        log::warn!("ignoring non-finite impact threshold {}", threshold);
        return;
    }
    sim.config.impact_threshold = threshold;
    sim.impacts.set_threshold(threshold);
}

pub(super) fn set_audio_enabled<W: PhysicsWorld, S: TimeSource>(
    sim: &mut SimulationCore<W, S>,
    enabled: bool,
) {
    sim.impacts.set_audio_enabled(enabled);
}
