//! Application layer for votum
//!
//! This crate contains the motion lifecycle engine, the port definitions it
//! drives (store, roster, notifier, clock), and the expiration scheduler.
//! It depends only on the domain layer.
//!
//! # Concurrency model
//!
//! Every mutating operation on a council — propose, vote, kill, expiration
//! sweep — runs inside that council's exclusive critical section, because
//! interactive voters and the background timer race on the same aggregate.
//! Councils are otherwise independent and execute in parallel. External
//! collaborator calls are bounded by a timeout and their failures never roll
//! back a committed state transition.

pub mod engine;
pub mod ports;
pub mod scheduler;

// Re-export commonly used types
pub use engine::{
    CouncilStats, EngineError, LifecycleEngine, ProposeRequest, Proposed, VoteReceipt,
};
pub use ports::{
    clock::{Clock, ManualClock, SystemClock},
    notifier::{NoNotifier, Notifier, NotifyError},
    repository::{CouncilStore, InMemoryCouncilStore, StoreError},
    roster::{Roster, RosterError, StaticRoster},
};
pub use scheduler::ExpirationScheduler;
