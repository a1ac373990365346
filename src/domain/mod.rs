//! Domain types: what a simulated object *is*, independent of any engine.

pub mod config;
pub mod error;
pub mod proxy;
pub mod shape;

pub use config::SimulationConfig;
pub use error::{ConfigError, RegistryError, SpawnError};
pub use proxy::{GeometryKind, Transform, VisualProxy};
pub use shape::ShapeDescriptor;
