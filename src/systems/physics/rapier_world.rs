//! rapier3d-backed world.
//!
//! Mirrors the demo scene: gravity -9.82, one global contact material
//! (friction 0.1, restitution 0.7), a static ground plane, sleeping allowed.

use rapier3d::math::{Real, Vector};
use rapier3d::prelude::*;

use crate::domain::{ShapeDescriptor, SimulationConfig, Transform};

use super::convert::{
    from_rapier_handle, from_rotation, from_vector, to_isometry, to_rapier_handle, to_vector,
};
use super::events::ImpactCollector;
use super::substeps::SubStepper;
use super::{BodyDesc, BodyHandle, BodyPoses, CollisionEvent, PhysicsWorld, StepReport};

pub struct RapierWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collector: ImpactCollector,
    stepper: SubStepper,
    ground_handle: RigidBodyHandle,
    friction: Real,
    restitution: Real,
    allow_sleep: bool,
}

impl RapierWorld {
    pub fn new(config: &SimulationConfig) -> Self {
        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();

        // Infinite ground plane facing +Y, mass 0.
        let ground = RigidBodyBuilder::fixed()
            .translation(Vector::new(0.0, config.ground_height, 0.0))
            .build();
        let ground_handle = rigid_body_set.insert(ground);
        let ground_collider = ColliderBuilder::halfspace(Vector::y_axis())
            .friction(config.friction)
            .restitution(config.restitution)
            .build();
        collider_set.insert_with_parent(ground_collider, ground_handle, &mut rigid_body_set);

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.fixed_dt;

        let gravity = config.gravity_vec();
        log::info!(
            "rapier world: gravity={}, friction={}, restitution={}, ground_y={}",
            gravity,
            config.friction,
            config.restitution,
            config.ground_height
        );

        Self {
            gravity: to_vector(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set,
            collider_set,
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collector: ImpactCollector::default(),
            stepper: SubStepper::new(),
            ground_handle,
            friction: config.friction,
            restitution: config.restitution,
            allow_sleep: config.allow_sleep,
        }
    }

    pub fn ground(&self) -> BodyHandle {
        from_rapier_handle(self.ground_handle)
    }

    /// Current linear velocity, mostly for tests and debugging overlays.
    pub fn body_linvel(&self, handle: BodyHandle) -> Option<glam::Vec3> {
        self.rigid_body_set
            .get(to_rapier_handle(handle))
            .map(|b| from_vector(b.linvel()))
    }

    /// Overwrite a body's linear and angular velocity and wake it.
    pub fn set_body_velocity(
        &mut self,
        handle: BodyHandle,
        linvel: glam::Vec3,
        angvel: glam::Vec3,
    ) -> bool {
        match self.rigid_body_set.get_mut(to_rapier_handle(handle)) {
            Some(body) => {
                body.set_linvel(to_vector(linvel), true);
                body.set_angvel(to_vector(angvel), true);
                true
            }
            None => false,
        }
    }

    fn step_once(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collector,
        );
    }
}

impl BodyPoses for RigidBodySet {
    fn transform(&self, handle: BodyHandle) -> Option<Transform> {
        self.get(to_rapier_handle(handle)).map(|b| Transform {
            position: from_vector(b.translation()),
            orientation: from_rotation(b.rotation()),
        })
    }
}

impl PhysicsWorld for RapierWorld {
    type Poses = RigidBodySet;

    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .position(to_isometry(&desc.transform))
            .can_sleep(self.allow_sleep)
            .build();
        let handle = self.rigid_body_set.insert(body);

        let builder = match desc.shape {
            ShapeDescriptor::Sphere { radius } => ColliderBuilder::ball(radius),
            ShapeDescriptor::Box { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
        };
        let collider = builder
            .mass(desc.mass)
            .friction(self.friction)
            .restitution(self.restitution)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        from_rapier_handle(handle)
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let handle = to_rapier_handle(handle);
        if handle == self.ground_handle {
            return false;
        }
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    fn step(&mut self, fixed_dt: f32, actual_dt: f64, max_sub_steps: u32) -> StepReport {
        let plan = self.stepper.plan(fixed_dt, actual_dt, max_sub_steps);
        for _ in 0..plan.sub_steps {
            self.step_once(fixed_dt);
        }
        if plan.dropped_time > 0.0 {
            log::debug!("sub-step cap hit, dropped {:.3}s of simulation time", plan.dropped_time);
        }
        StepReport {
            sub_steps: plan.sub_steps,
            dropped_time: plan.dropped_time,
        }
    }

    fn set_collision_listener(&mut self, handle: BodyHandle, enabled: bool) -> bool {
        let Some(body) = self.rigid_body_set.get(to_rapier_handle(handle)) else {
            return false;
        };
        let events = if enabled {
            ActiveEvents::COLLISION_EVENTS
        } else {
            ActiveEvents::empty()
        };
        for &collider_handle in body.colliders() {
            if let Some(collider) = self.collider_set.get_mut(collider_handle) {
                collider.set_active_events(events);
            }
        }
        true
    }

    fn drain_collisions(&mut self, out: &mut Vec<CollisionEvent>) {
        self.collector.drain_into(out);
    }

    fn poses(&self) -> &RigidBodySet {
        &self.rigid_body_set
    }

    fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    fn dynamic_body_count(&self) -> usize {
        self.rigid_body_set
            .iter()
            .filter(|(_, body)| body.is_dynamic())
            .count()
    }
}
