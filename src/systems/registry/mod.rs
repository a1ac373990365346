//! PairedObjectRegistry - owns every (physics body, visual proxy) pair.
//!
//! A pair is created and destroyed as one unit: the registry never holds a
//! body without its proxy or the other way round. Ids come from a
//! generational arena so removal is O(1) and stale ids cannot alias.

mod arena;

use glam::Vec3;

use crate::domain::{RegistryError, ShapeDescriptor, SpawnError, Transform, VisualProxy};
use crate::systems::physics::{BodyDesc, BodyHandle, BodyPoses, PhysicsWorld};

pub use arena::{Arena, ObjectId};

#[derive(Clone, Debug, PartialEq)]
pub struct PairedObject {
    pub id: ObjectId,
    pub body: BodyHandle,
    pub shape: ShapeDescriptor,
    pub proxy: VisualProxy,
}

pub struct PairedObjectRegistry {
    objects: Arena<PairedObject>,
    spawn_mass: f32,
    /// Bumped whenever the set of proxies changes, so the host knows when to
    /// rebuild its meshes instead of just moving them.
    scene_revision: u32,
}

impl PairedObjectRegistry {
    pub fn new(spawn_mass: f32) -> Self {
        Self {
            objects: Arena::with_capacity(128),
            spawn_mass,
            scene_revision: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn scene_revision(&self) -> u32 {
        self.scene_revision
    }

    pub fn get(&self, id: ObjectId) -> Option<&PairedObject> {
        self.objects.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PairedObject> {
        self.objects.iter()
    }

    /// Create a dynamic body and its proxy at `position`.
    ///
    /// The position is used as given; callers that want objects to drop into
    /// place spawn them above their resting height and let gravity settle them.
    pub fn spawn<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        shape: ShapeDescriptor,
        position: Vec3,
    ) -> Result<ObjectId, SpawnError> {
        shape.validate()?;
        if !position.is_finite() {
            return Err(SpawnError::InvalidPosition);
        }

        let transform = Transform::from_position(position);
        let body = world.add_body(&BodyDesc {
            shape,
            transform,
            mass: self.spawn_mass,
        });
        world.set_collision_listener(body, true);

        let proxy = VisualProxy::new(transform, shape.proxy_scale(), shape.geometry());
        let id = self.objects.insert_with(|id| PairedObject {
            id,
            body,
            shape,
            proxy,
        });
        self.scene_revision = self.scene_revision.wrapping_add(1);
        Ok(id)
    }

    /// Copy every body's position and orientation onto its proxy.
    ///
    /// Returns the number of synced pairs. A pair whose body is gone is an
    /// invariant failure: the rest are still synced, then the failure is
    /// reported.
    pub fn sync_all<W: PhysicsWorld>(&mut self, world: &W) -> Result<usize, RegistryError> {
        let poses = world.poses();
        let total = self.objects.len();

        #[cfg(feature = "parallel")]
        let missing = {
            use rayon::prelude::*;
            self.objects
                .par_iter_mut()
                .map(|obj| sync_one(poses, obj))
                .filter(|synced| !synced)
                .count()
        };
        #[cfg(not(feature = "parallel"))]
        let missing = self
            .objects
            .iter_mut()
            .map(|obj| sync_one(poses, obj))
            .filter(|synced| !synced)
            .count();

        if missing > 0 {
            let first = self
                .objects
                .iter()
                .find(|obj| poses.transform(obj.body).is_none())
                .map(|obj| obj.id.to_string())
                .unwrap_or_default();
            return Err(RegistryError::MissingBody {
                count: missing,
                first,
            });
        }
        Ok(total)
    }

    /// Remove one pair. The body leaves the world, the proxy leaves the scene.
    pub fn remove<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        id: ObjectId,
    ) -> Result<(), RegistryError> {
        let obj = self
            .objects
            .remove(id)
            .ok_or_else(|| RegistryError::UnknownObject(id.to_string()))?;
        world.set_collision_listener(obj.body, false);
        self.scene_revision = self.scene_revision.wrapping_add(1);
        if !world.remove_body(obj.body) {
            log::error!("paired object {} had no body in the world", obj.id);
            return Err(RegistryError::MissingBody {
                count: 1,
                first: obj.id.to_string(),
            });
        }
        Ok(())
    }

    /// Detach every body and proxy and empty the registry. Idempotent.
    /// Returns how many pairs were removed.
    pub fn remove_all<W: PhysicsWorld>(&mut self, world: &mut W) -> usize {
        if self.objects.is_empty() {
            return 0;
        }
        let mut removed = 0usize;
        let mut orphaned = 0usize;
        self.objects.drain_each(|obj| {
            if !world.remove_body(obj.body) {
                orphaned += 1;
            }
            removed += 1;
        });
        if orphaned > 0 {
            log::error!("{} paired object(s) had already lost their body", orphaned);
        }
        self.scene_revision = self.scene_revision.wrapping_add(1);
        removed
    }

    /// Bodies currently owned by the registry.
    pub fn bodies(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.objects.iter().map(|obj| obj.body)
    }
}

#[inline]
fn sync_one<P: BodyPoses>(poses: &P, obj: &mut PairedObject) -> bool {
    match poses.transform(obj.body) {
        Some(transform) => {
            obj.proxy.apply(transform);
            true
        }
        None => false,
    }
}
