//! Error types for spawning, registry bookkeeping and config loading.

use thiserror::Error;

/// Precondition failures when creating a paired object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    #[error("sphere radius must be finite and > 0, got {0}")]
    InvalidRadius(f32),

    #[error("box half extents must be finite and > 0, got ({x}, {y}, {z})")]
    InvalidExtents { x: f32, y: f32, z: f32 },

    #[error("spawn position must be finite")]
    InvalidPosition,
}

/// Internal invariant failures: a registered pair lost one of its halves.
///
/// These should never happen; they are surfaced instead of swallowed so
/// bugs show up in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{count} paired object(s) reference a body the world no longer has (first: {first})")]
    MissingBody { count: usize, first: String },

    #[error("unknown object id {0}")]
    UnknownObject(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
