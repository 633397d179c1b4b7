//! Domain layer for votum
//!
//! This crate contains the core business logic, entities, and value objects
//! of the deliberative-voting engine. It has no dependencies on
//! infrastructure or I/O concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A per-channel voting body, identified by a `(guild, channel)` pair. It
//! owns at most one current [`Motion`], a FIFO queue of pending motions, an
//! archive of resolved ones, vote-weight overrides, and a typed
//! configuration map.
//!
//! ## Motion
//!
//! A proposal advancing through propose → vote → resolve. Transitions are
//! one-directional: once a motion leaves `active` it never comes back.
//!
//! ## Weighted voting
//!
//! Each vote is scaled by the voter's weight: explicit per-user override,
//! else the sum of overrides for roles the voter currently holds, else 1.
//! Weights are never cached on a vote, so a changed override retroactively
//! affects an open tally.

pub mod config;
pub mod core;
pub mod council;
pub mod motion;

// Re-export commonly used types
pub use config::{ConfigKeyInfo, ConfigKind, ConfigValue, known_keys, lookup_key, validate_config};
pub use core::{
    error::{DomainError, ErrorKind},
    ids::{ChannelId, CouncilId, GuildId, Principal, PrincipalId},
};
pub use council::{Council, CouncilMember, DEFAULT_EXPIRATION_MINUTES};
pub use motion::{
    MAX_TITLE_LEN, Majority, Motion, MotionStatus, Tally, VoteChoice, early_outcome,
    expiration_outcome, parse_majority, weighted_tally,
};
