use std::sync::Mutex;

use rapier3d::math::{Point, Real, Vector};
use rapier3d::prelude::{
    ActiveEvents, ColliderHandle, ColliderSet, CollisionEvent as RapierCollisionEvent, ContactPair,
    EventHandler, RigidBodySet,
};

use super::convert::{from_rapier_handle, from_vector};
use super::CollisionEvent;

/// Records contact starts during `PhysicsPipeline::step`.
///
/// Rapier calls this from inside the step, so it only queues; the queue is
/// drained once the step has returned.
#[derive(Default)]
pub(super) struct ImpactCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl ImpactCollector {
    pub(super) fn drain_into(&self, out: &mut Vec<CollisionEvent>) {
        if let Ok(mut events) = self.events.lock() {
            out.append(&mut events);
        }
    }
}

fn is_listening(colliders: &ColliderSet, handle: ColliderHandle) -> bool {
    colliders
        .get(handle)
        .map_or(false, |c| c.active_events().contains(ActiveEvents::COLLISION_EVENTS))
}

/// Velocity of the collider's body at a world-space point, spin included.
/// Colliders without a body (or with a fixed one) count as still.
fn velocity_at(
    bodies: &RigidBodySet,
    colliders: &ColliderSet,
    handle: ColliderHandle,
    point: &Point<Real>,
) -> Vector<Real> {
    colliders
        .get(handle)
        .and_then(|c| c.parent())
        .and_then(|b| bodies.get(b))
        .map(|b| b.velocity_at_point(point))
        .unwrap_or_else(Vector::zeros)
}

impl EventHandler for ImpactCollector {
    fn handle_collision_event(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: RapierCollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        if !event.started() {
            return;
        }
        // Sensors have no contact pair and no impact.
        let Some(pair) = contact_pair else {
            return;
        };
        let Some(manifold) = pair.manifolds.iter().find(|m| !m.points.is_empty()) else {
            return;
        };

        let (mut c1, mut c2) = (event.collider1(), event.collider2());
        if !is_listening(colliders, c1) {
            std::mem::swap(&mut c1, &mut c2);
        }
        let Some(body_a) = colliders.get(c1).and_then(|c| c.parent()) else {
            return;
        };
        let body_b = colliders.get(c2).and_then(|c| c.parent());

        // Deepest point, in world space. Manifold points are local to the
        // pair's first collider.
        let deepest = manifold
            .points
            .iter()
            .min_by(|a, b| a.dist.total_cmp(&b.dist));
        let Some(contact) = deepest else {
            return;
        };
        let Some(frame) = colliders.get(pair.collider1).map(|c| *c.position()) else {
            return;
        };
        let point = frame * contact.local_p1;

        let normal = manifold.data.normal;
        // Velocities are still pre-solve here: this is the closing speed at impact.
        let relative =
            velocity_at(bodies, colliders, c1, &point) - velocity_at(bodies, colliders, c2, &point);
        let along_normal = relative.dot(&normal).abs();

        if let Ok(mut events) = self.events.lock() {
            events.push(CollisionEvent {
                body_a: from_rapier_handle(body_a),
                body_b: body_b.map(from_rapier_handle),
                contact_normal: from_vector(&normal),
                relative_velocity_along_normal: along_normal,
            });
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
