use glam::Vec3;

use crate::core::random::{next_range, next_unit};
use crate::domain::{ShapeDescriptor, SpawnError};
use crate::systems::clock::TimeSource;
use crate::systems::physics::PhysicsWorld;
use crate::systems::registry::ObjectId;

use super::SimulationCore;

/// Mutation requested while a frame may be in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeferredCommand {
    Spawn {
        shape: ShapeDescriptor,
        position: Vec3,
    },
    Remove(ObjectId),
}

pub(super) fn spawn<W: PhysicsWorld, S: TimeSource>(
    sim: &mut SimulationCore<W, S>,
    shape: ShapeDescriptor,
    position: Vec3,
) -> Result<ObjectId, SpawnError> {
    match sim.registry.spawn(&mut sim.world, shape, position) {
        Ok(id) => {
            if let Some(obj) = sim.registry.get(id) {
                sim.impacts.subscribe(obj.body);
            }
            Ok(id)
        }
        Err(err) => {
            log::warn!("spawn rejected: {}", err);
            Err(err)
        }
    }
}

pub(super) fn remove<W: PhysicsWorld, S: TimeSource>(
    sim: &mut SimulationCore<W, S>,
    id: ObjectId,
) -> bool {
    let Some(body) = sim.registry.get(id).map(|obj| obj.body) else {
        return false;
    };
    sim.impacts.unsubscribe(body);
    match sim.registry.remove(&mut sim.world, id) {
        Ok(()) => true,
        Err(err) => {
            log::error!("remove {}: {}", id, err);
            // The pair is gone from the registry either way.
            true
        }
    }
}

/// The demo's population routine: `count` spheres with radius in
/// [0, max_radius) over a square of half width `scatter_extent`, all at the
/// configured spawn height. Zero radii are rejected like any other invalid
/// shape and simply skipped.
pub(super) fn scatter_spheres<W: PhysicsWorld, S: TimeSource>(
    sim: &mut SimulationCore<W, S>,
    count: u32,
    seed: u32,
) -> u32 {
    if seed != 0 {
        sim.rng_state = seed;
    }
    let extent = sim.config.scatter_extent;
    let max_radius = sim.config.scatter_max_radius;
    let height = sim.config.spawn_height;

    let mut spawned = 0u32;
    for _ in 0..count {
        let radius = next_unit(&mut sim.rng_state) * max_radius;
        let x = next_range(&mut sim.rng_state, -extent, extent);
        let z = next_range(&mut sim.rng_state, -extent, extent);
        if spawn(sim, ShapeDescriptor::sphere(radius), Vec3::new(x, height, z)).is_ok() {
            spawned += 1;
        }
    }
    spawned
}

pub(super) fn defer<W: PhysicsWorld, S: TimeSource>(
    sim: &mut SimulationCore<W, S>,
    command: DeferredCommand,
) {
    sim.pending.push(command);
}

/// Run queued commands. Called only at a frame boundary.
pub(super) fn apply_deferred<W: PhysicsWorld, S: TimeSource>(sim: &mut SimulationCore<W, S>) -> usize {
    if sim.pending.is_empty() {
        return 0;
    }
    let pending = std::mem::take(&mut sim.pending);
    let mut applied = 0;
    for command in pending.iter() {
        let ok = match *command {
            DeferredCommand::Spawn { shape, position } => spawn(sim, shape, position).is_ok(),
            DeferredCommand::Remove(id) => remove(sim, id),
        };
        if ok {
            applied += 1;
        }
    }
    // Hand the allocation back so steady-state frames do not reallocate.
    let mut pending = pending;
    pending.clear();
    if sim.pending.is_empty() {
        sim.pending = pending;
    }
    applied
}

/// Unhook every listener, then drop every pair. Nothing is left half torn
/// down when this returns; calling it again is a no-op.
pub(super) fn reset<W: PhysicsWorld, S: TimeSource>(sim: &mut SimulationCore<W, S>) -> usize {
    for body in sim.registry.bodies() {
        sim.world.set_collision_listener(body, false);
    }
    sim.impacts.unsubscribe_all();

    let removed = sim.registry.remove_all(&mut sim.world);

    sim.pending.clear();
    // Contacts reported before the reset must not play after it.
    sim.collisions.clear();
    sim.world.drain_collisions(&mut sim.collisions);
    sim.collisions.clear();
    sim.impacts.queue_mut().clear();
    sim.render.clear();

    if removed > 0 {
        log::info!("reset: removed {} objects", removed);
    }
    removed
}
