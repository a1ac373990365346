use crate::domain::SimulationConfig;
use crate::systems::clock::{FixedStepClock, HostClock, TimeSource};
use crate::systems::impact::ImpactDispatcher;
use crate::systems::physics::{PhysicsWorld, RapierWorld};
use crate::systems::registry::PairedObjectRegistry;

use super::frame_stats::FrameStats;
use super::render_extract::RenderBuffers;
use super::SimulationCore;

pub(super) fn create_simulation(config: SimulationConfig) -> SimulationCore<RapierWorld, HostClock> {
    let world = RapierWorld::new(&config);
    assemble(config, world, HostClock::new())
}

pub(super) fn assemble<W: PhysicsWorld, S: TimeSource>(
    config: SimulationConfig,
    world: W,
    source: S,
) -> SimulationCore<W, S> {
    let impacts = ImpactDispatcher::new(
        config.impact_threshold,
        config.max_cues_per_frame,
        config.audio_seed,
    );
    SimulationCore {
        registry: PairedObjectRegistry::new(config.spawn_mass),
        clock: FixedStepClock::new(source),
        impacts,
        world,
        pending: Vec::with_capacity(16),
        collisions: Vec::with_capacity(64),
        render: RenderBuffers::with_capacity(128),
        frame: 0,
        rng_state: 12345,
        stats: FrameStats::default(),
        config,
    }
}
