use wasm_bindgen::prelude::*;

/// What the last frame did. Cheap enough to fill every frame.
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub(super) frame_ms: f64,
    pub(super) elapsed: f64,
    pub(super) delta: f64,
    pub(super) sub_steps: u32,
    pub(super) dropped_time: f64,
    pub(super) collisions: u32,
    pub(super) cues: u32,
    pub(super) cues_dropped: u32,
    pub(super) synced_objects: u32,
    pub(super) deferred_applied: u32,
    pub(super) dynamic_bodies: u32,
}

impl FrameStats {
    pub(crate) fn reset(&mut self) {
        *self = FrameStats::default();
    }
}

#[wasm_bindgen]
impl FrameStats {
    #[wasm_bindgen(getter)]
    pub fn frame_ms(&self) -> f64 { self.frame_ms }
    #[wasm_bindgen(getter)]
    pub fn elapsed(&self) -> f64 { self.elapsed }
    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> f64 { self.delta }
    #[wasm_bindgen(getter)]
    pub fn sub_steps(&self) -> u32 { self.sub_steps }
    #[wasm_bindgen(getter)]
    pub fn dropped_time(&self) -> f64 { self.dropped_time }
    #[wasm_bindgen(getter)]
    pub fn collisions(&self) -> u32 { self.collisions }
    #[wasm_bindgen(getter)]
    pub fn cues(&self) -> u32 { self.cues }
    #[wasm_bindgen(getter)]
    pub fn cues_dropped(&self) -> u32 { self.cues_dropped }
    #[wasm_bindgen(getter)]
    pub fn synced_objects(&self) -> u32 { self.synced_objects }
    #[wasm_bindgen(getter)]
    pub fn deferred_applied(&self) -> u32 { self.deferred_applied }
    #[wasm_bindgen(getter)]
    pub fn dynamic_bodies(&self) -> u32 { self.dynamic_bodies }
}
