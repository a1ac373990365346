//! glam <-> rapier (nalgebra) conversions.

use glam::{Quat, Vec3};
use rapier3d::math::{Isometry, Real, Rotation, Vector};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::RigidBodyHandle;

use crate::domain::Transform;

use super::BodyHandle;

#[inline]
pub(super) fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
pub(super) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub(super) fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub(super) fn from_rotation(r: &Rotation<Real>) -> Quat {
    let c = r.coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

pub(super) fn to_isometry(t: &Transform) -> Isometry<Real> {
    Isometry::from_parts(to_vector(t.position).into(), to_rotation(t.orientation))
}

#[inline]
pub(super) fn to_rapier_handle(h: BodyHandle) -> RigidBodyHandle {
    RigidBodyHandle::from_raw_parts(h.index, h.generation)
}

#[inline]
pub(super) fn from_rapier_handle(h: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = h.into_raw_parts();
    BodyHandle::new(index, generation)
}
