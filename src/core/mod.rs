//! Core utilities shared by every system: logging bridge and the cheap rng.

#[path = "utils/logging.rs"]
pub mod logging;
#[path = "utils/random.rs"]
pub mod random;
