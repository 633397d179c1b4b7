//! Durable council storage.

mod json_store;

pub use json_store::JsonCouncilStore;
