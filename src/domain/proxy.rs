use glam::{Quat, Vec3};

/// Mesh the host renderer should draw for a proxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum GeometryKind {
    Sphere = 0,
    Box = 1,
}

/// Rigid transform shared between a physics body and its proxy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

/// Renderer-facing half of a paired object.
///
/// The host scene draws whatever is here; the core only ever writes the
/// transform. Position and orientation are copied verbatim from the body,
/// never interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualProxy {
    pub transform: Transform,
    pub scale: Vec3,
    pub geometry: GeometryKind,
}

impl VisualProxy {
    pub fn new(transform: Transform, scale: Vec3, geometry: GeometryKind) -> Self {
        Self {
            transform,
            scale,
            geometry,
        }
    }

    #[inline]
    pub fn apply(&mut self, transform: Transform) {
        self.transform = transform;
    }
}
