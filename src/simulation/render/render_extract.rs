use crate::systems::registry::PairedObjectRegistry;

/// Floats per object in the transform buffer:
/// position xyz, orientation xyzw, scale xyz, geometry kind.
pub const FLOATS_PER_OBJECT: usize = 11;

/// Flat buffers the host renderer reads after each frame.
///
/// `transforms[i * FLOATS_PER_OBJECT..]` belongs to the object whose id is
/// `(ids[2 * i], ids[2 * i + 1])` (index, generation).
pub struct RenderBuffers {
    pub(crate) transforms: Vec<f32>,
    pub(crate) ids: Vec<u32>,
    scene_revision: u32,
}

impl RenderBuffers {
    pub fn with_capacity(objects: usize) -> Self {
        Self {
            transforms: Vec::with_capacity(objects * FLOATS_PER_OBJECT),
            ids: Vec::with_capacity(objects * 2),
            scene_revision: 0,
        }
    }

    pub fn object_count(&self) -> usize {
        self.ids.len() / 2
    }

    pub fn transforms(&self) -> &[f32] {
        &self.transforms
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Registry revision the buffers were extracted at.
    pub fn scene_revision(&self) -> u32 {
        self.scene_revision
    }

    pub fn transforms_ptr(&self) -> *const f32 {
        self.transforms.as_ptr()
    }

    pub fn ids_ptr(&self) -> *const u32 {
        self.ids.as_ptr()
    }

    pub fn clear(&mut self) {
        self.transforms.clear();
        self.ids.clear();
    }
}

pub(super) fn extract(registry: &PairedObjectRegistry, out: &mut RenderBuffers) {
    out.clear();
    for obj in registry.iter() {
        let t = &obj.proxy.transform;
        let s = obj.proxy.scale;
        out.transforms.extend_from_slice(&[
            t.position.x,
            t.position.y,
            t.position.z,
            t.orientation.x,
            t.orientation.y,
            t.orientation.z,
            t.orientation.w,
            s.x,
            s.y,
            s.z,
            obj.proxy.geometry as u8 as f32,
        ]);
        out.ids.push(obj.id.index);
        out.ids.push(obj.id.generation);
    }
    out.scene_revision = registry.scene_revision();
}
