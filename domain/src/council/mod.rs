//! Councils: per-channel voting bodies.

pub mod entities;

pub use entities::{Council, CouncilMember, DEFAULT_EXPIRATION_MINUTES};
