//! Ports: the narrow interfaces the engine drives.
//!
//! Implementations (adapters) live in the infrastructure layer or in the
//! host embedding; each port ships a simple default implementation usable
//! in tests and minimal deployments.

pub mod clock;
pub mod notifier;
pub mod repository;
pub mod roster;
