use glam::Vec3;
use wasm_bindgen::prelude::*;

use crate::domain::{ShapeDescriptor, SimulationConfig};
use crate::systems::registry::ObjectId;

use super::driver::{AnimationDriver, FrameOutcome};
use super::frame_stats::FrameStats;
use super::render_extract::FLOATS_PER_OBJECT;
use super::{DeferredCommand, SimulationCore};

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRef {
    index: u32,
    generation: u32,
}

#[wasm_bindgen]
impl ObjectRef {
    #[wasm_bindgen(getter)]
    pub fn index(&self) -> u32 { self.index }
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u32 { self.generation }
}

impl From<ObjectId> for ObjectRef {
    fn from(id: ObjectId) -> Self {
        Self {
            index: id.index,
            generation: id.generation,
        }
    }
}

/// Browser entry point. The page owns the renderer, the hit sound and the
/// debug panel; each `requestAnimationFrame` callback calls `frame(ts)`,
/// then reads transforms and audio cues back out.
#[wasm_bindgen]
pub struct Demo {
    core: SimulationCore,
    driver: AnimationDriver,
}

#[wasm_bindgen]
impl Demo {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            core: SimulationCore::new(),
            driver: AnimationDriver::new(),
        }
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: String) -> Result<Demo, JsValue> {
        let core = SimulationCore::from_config_json(&json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            core,
            driver: AnimationDriver::new(),
        })
    }

    pub fn config_json(&self) -> String {
        self.core.config().to_json()
    }

    pub fn default_config_json() -> String {
        SimulationConfig::default().to_json()
    }

    /// Run one frame at host time `timestamp_ms`.
    /// Returns false once stopped: the host should not schedule another frame.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        self.core.set_host_time_ms(timestamp_ms);
        self.driver.frame(&mut self.core) == FrameOutcome::Continue
    }

    pub fn stop(&mut self) {
        self.driver.stop_handle().request_stop();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    // === OBJECTS ===

    pub fn spawn_sphere(&mut self, radius: f32, x: f32, y: f32, z: f32) -> Result<ObjectRef, JsValue> {
        self.core
            .spawn_sphere(radius, Vec3::new(x, y, z))
            .map(ObjectRef::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn spawn_box(
        &mut self,
        width: f32,
        height: f32,
        depth: f32,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<ObjectRef, JsValue> {
        self.core
            .spawn_box(Vec3::new(width, height, depth), Vec3::new(x, y, z))
            .map(ObjectRef::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Spawn on the next frame boundary (safe from any host callback).
    pub fn queue_sphere(&mut self, radius: f32, x: f32, y: f32, z: f32) {
        self.core.defer(DeferredCommand::Spawn {
            shape: ShapeDescriptor::sphere(radius),
            position: Vec3::new(x, y, z),
        });
    }

    pub fn queue_remove(&mut self, index: u32, generation: u32) {
        self.core
            .defer(DeferredCommand::Remove(ObjectId { index, generation }));
    }

    pub fn scatter_spheres(&mut self, count: u32, seed: u32) -> u32 {
        self.core.scatter_spheres(count, seed)
    }

    /// Debug panel "reset" button.
    pub fn reset(&mut self) -> u32 {
        self.core.reset() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> u32 { self.core.object_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn dynamic_body_count(&self) -> u32 { self.core.dynamic_body_count() as u32 }

    #[wasm_bindgen(getter)]
    pub fn scene_revision(&self) -> u32 { self.core.registry().scene_revision() }

    #[wasm_bindgen(getter)]
    pub fn frame_count(&self) -> u64 { self.core.frame() }

    // === RENDER HANDOFF ===

    pub fn floats_per_object() -> u32 {
        FLOATS_PER_OBJECT as u32
    }

    pub fn transforms_ptr(&self) -> *const f32 {
        self.core.render().transforms_ptr()
    }

    pub fn transforms_len(&self) -> usize {
        self.core.render().transforms().len()
    }

    pub fn ids_ptr(&self) -> *const u32 {
        self.core.render().ids_ptr()
    }

    pub fn ids_len(&self) -> usize {
        self.core.render().ids().len()
    }

    /// Copying variant for hosts that do not read wasm memory directly.
    pub fn transforms(&self) -> Vec<f32> {
        self.core.render().transforms().to_vec()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.core.render().ids().to_vec()
    }

    // === AUDIO ===

    /// Volumes of the hit sounds to play this frame (each with restart).
    /// Call after every `frame`: cues left here are dropped by the next one.
    pub fn take_audio_cues(&mut self) -> Vec<f32> {
        self.core.take_audio_cues()
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.core.set_audio_enabled(enabled);
    }

    pub fn set_impact_threshold(&mut self, threshold: f32) {
        self.core.set_impact_threshold(threshold);
    }

    pub fn get_frame_stats(&self) -> FrameStats {
        self.core.stats().clone()
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}
