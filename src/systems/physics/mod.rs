//! Physics world seam.
//!
//! The core never integrates bodies itself: it drives a `PhysicsWorld` (in
//! production the rapier3d-backed `RapierWorld`) and reacts to the collision
//! events it reports. Sub-stepping policy lives here so every backend caps
//! per-frame work the same way.

mod convert;
mod events;
mod rapier_world;
mod substeps;

use glam::Vec3;

use crate::domain::{ShapeDescriptor, Transform};

pub use rapier_world::RapierWorld;
pub use substeps::{StepPlan, SubStepper};

/// Opaque reference to a body owned by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    pub index: u32,
    pub generation: u32,
}

impl BodyHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// Everything the world needs to create a dynamic body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyDesc {
    pub shape: ShapeDescriptor,
    pub transform: Transform,
    /// 0 would mean static; spawned objects are always dynamic.
    pub mass: f32,
}

/// One contact start between two bodies, reported after the sub-step that
/// produced it. `body_a` is always a body with an active collision listener.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionEvent {
    pub body_a: BodyHandle,
    pub body_b: Option<BodyHandle>,
    pub contact_normal: Vec3,
    /// Closing speed along the contact normal (always >= 0).
    pub relative_velocity_along_normal: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    pub sub_steps: u32,
    /// Time thrown away because the sub-step cap was hit.
    pub dropped_time: f64,
}

/// Read-only pose lookup, shareable across threads for the sync pass.
pub trait BodyPoses {
    fn transform(&self, handle: BodyHandle) -> Option<Transform>;
}

pub trait PhysicsWorld {
    type Poses: BodyPoses + Sync;

    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Returns false if the world did not know the body.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    /// Advance by `actual_dt` in sub-steps of `fixed_dt`, at most
    /// `max_sub_steps` of them. Time beyond the cap is dropped.
    fn step(&mut self, fixed_dt: f32, actual_dt: f64, max_sub_steps: u32) -> StepReport;

    /// Register (or drop) the per-body collision listener.
    /// Returns false if the world did not know the body.
    fn set_collision_listener(&mut self, handle: BodyHandle, enabled: bool) -> bool;

    /// Move the collisions reported since the last drain into `out`.
    fn drain_collisions(&mut self, out: &mut Vec<CollisionEvent>);

    fn poses(&self) -> &Self::Poses;

    fn body_transform(&self, handle: BodyHandle) -> Option<Transform> {
        self.poses().transform(handle)
    }

    fn body_count(&self) -> usize;

    fn dynamic_body_count(&self) -> usize;
}
