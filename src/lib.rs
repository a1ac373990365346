//! Impact Engine - rigid-body drop demo in WASM
//!
//! Spheres and boxes fall onto a ground plane; each object is a physics body
//! paired with a visual proxy the host renders, and hard impacts are turned
//! into hit-sound cues.
//!
//! Architecture:
//! - core/       - logging bridge, rng
//! - domain/     - shapes, transforms, config, errors
//! - systems/    - clock, physics world, paired-object registry, impacts
//! - simulation/ - per-frame orchestration and the wasm facade

pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Thread pool for the parallel proxy sync
#[cfg(feature = "parallel")]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine: panic hook and console logging.
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    core::logging::init_logging();
    log::info!("impact engine {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::{ShapeDescriptor, SimulationConfig, Transform};
pub use simulation::{
    AnimationDriver, DeferredCommand, Demo, FrameOutcome, FrameStats, ObjectRef, SimulationCore,
    StopHandle,
};
pub use systems::physics::{PhysicsWorld, RapierWorld};
