//! Systems: each one owns a single concern of the frame.

pub mod clock;
pub mod impact;
pub mod physics;
pub mod registry;
