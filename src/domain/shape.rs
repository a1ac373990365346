use glam::Vec3;

use super::error::SpawnError;
use super::proxy::GeometryKind;

/// Collision shape of a spawned body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeDescriptor {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl ShapeDescriptor {
    pub fn sphere(radius: f32) -> Self {
        ShapeDescriptor::Sphere { radius }
    }

    /// Box from full width/height/depth.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        ShapeDescriptor::Box {
            half_extents: Vec3::new(width * 0.5, height * 0.5, depth * 0.5),
        }
    }

    /// Reject degenerate shapes before anything touches the world.
    pub fn validate(&self) -> Result<(), SpawnError> {
        match *self {
            ShapeDescriptor::Sphere { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(SpawnError::InvalidRadius(radius));
                }
            }
            ShapeDescriptor::Box { half_extents } => {
                let ok = half_extents.is_finite() && half_extents.min_element() > 0.0;
                if !ok {
                    return Err(SpawnError::InvalidExtents {
                        x: half_extents.x,
                        y: half_extents.y,
                        z: half_extents.z,
                    });
                }
            }
        }
        Ok(())
    }

    /// Scale applied to the unit mesh the renderer draws for this shape
    /// (unit-radius sphere, unit cube).
    pub fn proxy_scale(&self) -> Vec3 {
        match *self {
            ShapeDescriptor::Sphere { radius } => Vec3::splat(radius),
            ShapeDescriptor::Box { half_extents } => half_extents * 2.0,
        }
    }

    pub fn geometry(&self) -> GeometryKind {
        match self {
            ShapeDescriptor::Sphere { .. } => GeometryKind::Sphere,
            ShapeDescriptor::Box { .. } => GeometryKind::Box,
        }
    }
}
