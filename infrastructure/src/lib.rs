//! Infrastructure layer for votum
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: a JSON-file council store and a file-backed notifier.

pub mod notify;
pub mod persistence;

// Re-export commonly used types
pub use notify::FileNotifier;
pub use persistence::JsonCouncilStore;
