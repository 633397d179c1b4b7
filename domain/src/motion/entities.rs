//! Motion entity and its status/choice enums.

use crate::core::ids::PrincipalId;
use crate::motion::majority::Majority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum accepted title length, in characters.
pub const MAX_TITLE_LEN: usize = 5000;

/// Lifecycle status of a motion.
///
/// Transitions are one-directional: `Active` is the only non-terminal
/// status, and a motion never re-enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionStatus {
    Active,
    Passed,
    Failed,
    Killed,
    /// Part of the persisted contract for historical records; the engine
    /// resolves expirations to passed/failed/tied and never produces it.
    Expired,
    Tied,
}

impl MotionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MotionStatus::Active)
    }
}

impl fmt::Display for MotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MotionStatus::Active => "active",
            MotionStatus::Passed => "passed",
            MotionStatus::Failed => "failed",
            MotionStatus::Killed => "killed",
            MotionStatus::Expired => "expired",
            MotionStatus::Tied => "tied",
        };
        write!(f, "{s}")
    }
}

/// A voter's choice on a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
    Abstain,
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VoteChoice::Yes => "yes",
            VoteChoice::No => "no",
            VoteChoice::Abstain => "abstain",
        };
        write!(f, "{s}")
    }
}

/// A proposal subject to vote within a council (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motion {
    /// Strictly increasing per council; never reused.
    pub id: u64,
    /// Unique across the council's current, queued, and archived motions.
    pub title: String,
    pub text: String,
    pub proposer: PrincipalId,
    pub created_at: DateTime<Utc>,
    pub status: MotionStatus,
    /// Raw majority string, fixed at creation and parsed on demand.
    pub majority: Majority,
    /// One entry per voter; overwritten on a repeat vote.
    pub votes: BTreeMap<PrincipalId, VoteChoice>,
    /// Optional free-text reasons, keyed like `votes`.
    pub reasons: BTreeMap<PrincipalId, String>,
    /// Set exactly once, on leaving `Active`.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Absolute expiration instant, fixed at creation; `None` never expires.
    /// Carried unchanged through queueing — not recomputed on promotion.
    pub expires_at: Option<DateTime<Utc>>,
    /// Opaque reference to the external deliberation thread.
    pub thread_ref: Option<u64>,
    /// Opaque reference to the external live-status message.
    pub live_message_ref: Option<u64>,
}

impl Motion {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        text: impl Into<String>,
        proposer: PrincipalId,
        created_at: DateTime<Utc>,
        majority: Majority,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            text: text.into(),
            proposer,
            created_at,
            status: MotionStatus::Active,
            majority,
            votes: BTreeMap::new(),
            reasons: BTreeMap::new(),
            resolved_at: None,
            expires_at: None,
            thread_ref: None,
            live_message_ref: None,
        }
    }

    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Default title used when the proposer gave none.
    pub fn default_title(id: u64, text: &str) -> String {
        let head: String = text.chars().take(80).collect();
        format!("Motion #{id} — {head}")
    }

    /// Record a vote. Last write wins per voter.
    ///
    /// Returns `true` when this is the voter's first vote on this motion
    /// (used for the per-voter voted-count statistic).
    pub fn record_vote(
        &mut self,
        voter: PrincipalId,
        choice: VoteChoice,
        reason: Option<String>,
    ) -> bool {
        let first = !self.votes.contains_key(&voter);
        self.votes.insert(voter, choice);
        if let Some(reason) = reason {
            self.reasons.insert(voter, reason);
        }
        first
    }

    pub fn has_voted(&self, voter: PrincipalId) -> bool {
        self.votes.contains_key(&voter)
    }

    /// Move the motion to a terminal status.
    ///
    /// The resolution timestamp is set exactly once; resolving an already
    /// terminal motion is a no-op for the timestamp.
    pub fn resolve(&mut self, status: MotionStatus, now: DateTime<Utc>) {
        debug_assert!(status.is_terminal());
        self.status = status;
        if self.resolved_at.is_none() {
            self.resolved_at = Some(now);
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}
