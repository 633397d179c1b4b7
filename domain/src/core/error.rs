//! Domain error taxonomy.
//!
//! Every engine failure is one of four kinds: validation, authorization,
//! conflict, or not-found. Errors cross the council-lock boundary as typed
//! results, never as panics or control-flow signals.

use crate::core::ids::CouncilId;
use crate::motion::VoteChoice;
use thiserror::Error;

/// Broad classification of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Conflict,
    NotFound,
}

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("a motion titled \"{0}\" already exists in this council")]
    TitleConflict(String),

    #[error("a motion is already active and queueing is disabled")]
    QueueDisabled,

    #[error("motion creation is disabled for non-admins in this council")]
    CreationDisabled,

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("motion text is required")]
    MissingText,

    #[error("title too long ({len} chars, max {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("a reason is required when voting {0}")]
    ReasonRequired(VoteChoice),

    #[error("no active motion in this council")]
    NoActiveMotion,

    #[error("no council at {0}")]
    CouncilNotFound(CouncilId),

    #[error("a council already exists at {0}")]
    CouncilExists(CouncilId),

    #[error("unknown config key `{0}`")]
    UnknownConfigKey(String),

    #[error("config key `{0}` is deprecated: {1}")]
    DeprecatedConfigKey(String, &'static str),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidConfigValue { key: String, reason: String },

    #[error("vote weight must be >= 1")]
    InvalidWeight,
}

impl DomainError {
    /// Classify this error into the four-way taxonomy.
    pub fn kind(&self) -> ErrorKind {
        use DomainError::*;
        match self {
            TitleConflict(_) | QueueDisabled | CouncilExists(_) => ErrorKind::Conflict,
            Unauthorized(_) | CreationDisabled => ErrorKind::Authorization,
            NoActiveMotion | CouncilNotFound(_) => ErrorKind::NotFound,
            MissingText
            | TitleTooLong { .. }
            | ReasonRequired(_)
            | UnknownConfigKey(_)
            | DeprecatedConfigKey(..)
            | InvalidConfigValue { .. }
            | InvalidWeight => ErrorKind::Validation,
        }
    }
}
