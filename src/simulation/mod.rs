//! Simulation - the rigid-body scene as one explicit context.
//!
//! `SimulationCore` owns the world, the clock, the paired-object registry and
//! the impact dispatcher by composition. The `AnimationDriver` advances it
//! once per host frame; the wasm `Demo` facade wraps both for the browser.
//!
//! Everything that mutates the body set (spawn, remove, reset) takes
//! `&mut self`, so it can only run between frames, never inside a step.

use glam::Vec3;

use crate::domain::{ConfigError, RegistryError, ShapeDescriptor, SimulationConfig, SpawnError};
use crate::systems::clock::{ClockTick, FixedStepClock, HostClock, TimeSource};
use crate::systems::impact::ImpactDispatcher;
use crate::systems::physics::{CollisionEvent, PhysicsWorld, RapierWorld, StepReport};
use crate::systems::registry::{ObjectId, PairedObjectRegistry};

#[path = "perf/frame_stats.rs"]
mod frame_stats;
#[path = "driver/driver.rs"]
mod driver;
#[path = "commands/commands.rs"]
mod commands;
#[path = "render/render_extract.rs"]
mod render_extract;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use commands::DeferredCommand;
pub use driver::{AnimationDriver, DriverState, FrameOutcome, StopHandle};
pub use facade::{Demo, ObjectRef};
pub use frame_stats::FrameStats;
pub use render_extract::{RenderBuffers, FLOATS_PER_OBJECT};

/// The rigid-body scene: world + clock + registry + impact feedback.
pub struct SimulationCore<W: PhysicsWorld = RapierWorld, S: TimeSource = HostClock> {
    config: SimulationConfig,
    world: W,
    clock: FixedStepClock<S>,
    registry: PairedObjectRegistry,
    impacts: ImpactDispatcher,

    /// Spawns/removals requested mid-frame, applied at the next frame boundary.
    pending: Vec<DeferredCommand>,
    /// Scratch buffer for collisions drained after each step.
    collisions: Vec<CollisionEvent>,
    render: RenderBuffers,

    frame: u64,
    rng_state: u32,
    stats: FrameStats,
}

impl SimulationCore<RapierWorld, HostClock> {
    /// Default scene, driven by host timestamps.
    pub fn new() -> Self {
        init::create_simulation(SimulationConfig::default())
    }

    pub fn from_config_json(json: &str) -> Result<Self, ConfigError> {
        let config = SimulationConfig::from_json(json)?;
        Ok(init::create_simulation(config))
    }

    /// Feed the host's frame timestamp (milliseconds, rAF style).
    pub fn set_host_time_ms(&mut self, millis: f64) {
        self.clock.source_mut().set_millis(millis);
    }

    pub fn set_host_time_seconds(&mut self, seconds: f64) {
        self.clock.source_mut().set_seconds(seconds);
    }
}

impl Default for SimulationCore<RapierWorld, HostClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: PhysicsWorld, S: TimeSource> SimulationCore<W, S> {
    /// Assemble a scene from an already-built world and time source.
    pub fn with_parts(config: SimulationConfig, world: W, source: S) -> Self {
        init::assemble(config, world, source)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn registry(&self) -> &PairedObjectRegistry {
        &self.registry
    }

    pub fn impacts(&self) -> &ImpactDispatcher {
        &self.impacts
    }

    pub fn impacts_mut(&mut self) -> &mut ImpactDispatcher {
        &mut self.impacts
    }

    pub fn render(&self) -> &RenderBuffers {
        &self.render
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn object_count(&self) -> usize {
        self.registry.len()
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.world.dynamic_body_count()
    }

    pub fn pending_commands(&self) -> usize {
        self.pending.len()
    }

    // === COMMANDS ===

    pub fn spawn(&mut self, shape: ShapeDescriptor, position: Vec3) -> Result<ObjectId, SpawnError> {
        commands::spawn(self, shape, position)
    }

    pub fn spawn_sphere(&mut self, radius: f32, position: Vec3) -> Result<ObjectId, SpawnError> {
        commands::spawn(self, ShapeDescriptor::sphere(radius), position)
    }

    pub fn spawn_box(&mut self, size: Vec3, position: Vec3) -> Result<ObjectId, SpawnError> {
        commands::spawn(self, ShapeDescriptor::cuboid(size.x, size.y, size.z), position)
    }

    /// Random spheres dropped from the configured spawn height.
    pub fn scatter_spheres(&mut self, count: u32, seed: u32) -> u32 {
        commands::scatter_spheres(self, count, seed)
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        commands::remove(self, id)
    }

    /// Queue a command for the next frame boundary.
    pub fn defer(&mut self, command: DeferredCommand) {
        commands::defer(self, command)
    }

    /// Tear everything down. Complete when this returns.
    pub fn reset(&mut self) -> usize {
        commands::reset(self)
    }

    // === SETTINGS ===

    pub fn set_impact_threshold(&mut self, threshold: f32) {
        settings::set_impact_threshold(self, threshold);
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        settings::set_audio_enabled(self, enabled);
    }

    // === FRAME PIECES (driven by AnimationDriver) ===

    fn tick_clock(&mut self) -> ClockTick {
        self.clock.tick()
    }

    /// Step the world and dispatch the collisions it reported.
    fn step_world(&mut self, delta: f64) -> (StepReport, usize, usize) {
        let report = self.world.step(
            self.config.fixed_dt,
            delta,
            self.config.max_sub_steps,
        );
        self.collisions.clear();
        self.world.drain_collisions(&mut self.collisions);
        let cues = self.impacts.dispatch(&self.collisions);
        (report, self.collisions.len(), cues)
    }

    fn sync_objects(&mut self) -> usize {
        match self.registry.sync_all(&self.world) {
            Ok(n) => n,
            Err(err) => {
                log::error!("sync invariant failure: {}", err);
                match err {
                    RegistryError::MissingBody { count, .. } => {
                        self.registry.len().saturating_sub(count)
                    }
                    RegistryError::UnknownObject(_) => 0,
                }
            }
        }
    }

    fn apply_deferred(&mut self) -> usize {
        commands::apply_deferred(self)
    }

    fn extract_render(&mut self) {
        render_extract::extract(&self.registry, &mut self.render);
    }

    /// Hand pending audio cues to the host as a flat list of volumes.
    pub fn take_audio_cues(&mut self) -> Vec<f32> {
        self.impacts.queue_mut().drain().map(|cue| cue.volume).collect()
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
