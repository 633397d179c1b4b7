//! Core domain primitives: identifiers and the error taxonomy.

pub mod error;
pub mod ids;
