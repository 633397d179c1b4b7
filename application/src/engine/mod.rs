//! Motion lifecycle engine.
//!
//! The state machine governing a motion's transitions: propose → vote →
//! resolve, with the early-resolution test after every vote, the
//! expiration-driven path invoked by the scheduler, and FIFO queue
//! promotion inside the resolve pipeline. Every mutating operation runs in
//! the council's exclusive section and persists the aggregate before
//! returning; lifecycle announcements happen after the durable write and
//! never roll it back.

mod admin;
mod locks;
mod queries;
mod resolve;

pub use queries::CouncilStats;

use crate::ports::clock::Clock;
use crate::ports::notifier::{Notifier, NotifyError};
use crate::ports::repository::{CouncilStore, StoreError};
use crate::ports::roster::Roster;
use chrono::{DateTime, Utc};
use locks::CouncilLocks;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use votum_domain::{
    Council, CouncilId, CouncilMember, DomainError, MAX_TITLE_LEN, Majority, Motion,
    MotionStatus, Principal, Tally, VoteChoice, early_outcome, expiration_outcome,
    weighted_tally,
};

/// Errors returned by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Persistence failure on the triggering write; fatal to that call.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for [`LifecycleEngine::propose`].
#[derive(Debug, Clone, Default)]
pub struct ProposeRequest {
    pub text: String,
    /// Explicit title; defaults to `Motion #<id> — <text head>`.
    pub title: Option<String>,
    /// Majority override; defaults to the council's `majority.default`.
    pub majority: Option<String>,
}

impl ProposeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_majority(mut self, majority: impl Into<String>) -> Self {
        self.majority = Some(majority.into());
        self
    }
}

/// Outcome of a successful propose.
#[derive(Debug, Clone)]
pub struct Proposed {
    pub motion: Motion,
    /// True when an active motion forced this one into the queue.
    pub queued: bool,
}

/// Outcome of a recorded vote.
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    pub choice: VoteChoice,
    /// Weighted tally at the time of this vote (zeroed when the roster
    /// snapshot was unavailable).
    pub tally: Tally,
    /// Present when this vote completed the majority and resolved the
    /// motion before returning.
    pub resolved: Option<Motion>,
}

/// The deliberative-voting engine for all councils.
pub struct LifecycleEngine {
    store: Arc<dyn CouncilStore>,
    roster: Arc<dyn Roster>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    locks: CouncilLocks,
    /// Upper bound on any single Roster/Notifier call.
    collaborator_timeout: Duration,
}

impl LifecycleEngine {
    pub fn new(
        store: Arc<dyn CouncilStore>,
        roster: Arc<dyn Roster>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            roster,
            notifier,
            clock,
            locks: CouncilLocks::new(),
            collaborator_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }

    /// Current instant from the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Ids of every stored council, for sweeps and introspection.
    pub async fn list_councils(&self) -> Result<Vec<CouncilId>, EngineError> {
        Ok(self.store.list().await?)
    }

    /// Create (or queue) a new motion.
    pub async fn propose(
        &self,
        council_id: CouncilId,
        principal: &Principal,
        request: ProposeRequest,
    ) -> Result<Proposed, EngineError> {
        let lock = self.locks.for_council(council_id);
        let _section = lock.lock().await;

        let mut council = self.load(council_id).await?;

        if council.motion_creation_disabled() && !principal.admin {
            return Err(DomainError::CreationDisabled.into());
        }
        if let Some(role) = council.propose_role()
            && !principal.admin
            && !principal.has_role(role)
        {
            return Err(
                DomainError::Unauthorized("the propose role is required".to_string()).into(),
            );
        }

        let text = request.text.trim().to_string();
        if text.is_empty() {
            return Err(DomainError::MissingText.into());
        }
        if let Some(title) = &request.title {
            let len = title.chars().count();
            if len > MAX_TITLE_LEN {
                return Err(DomainError::TitleTooLong { len, max: MAX_TITLE_LEN }.into());
            }
            if !council.title_is_unique(title) {
                return Err(DomainError::TitleConflict(title.clone()).into());
            }
        }
        if council.current_motion.is_some() && !council.queue_enabled() {
            return Err(DomainError::QueueDisabled.into());
        }

        let id = council.take_motion_id();
        let title = request
            .title
            .unwrap_or_else(|| Motion::default_title(id, &text));
        let majority = request
            .majority
            .map(Majority::new)
            .unwrap_or_else(|| council.default_majority());

        let now = self.clock.now();
        let mut motion = Motion::new(id, title, text, principal.id, now, majority);
        // Expiration is fixed here and carried unchanged through queueing;
        // promotion does not recompute it.
        if let Some(minutes) = council.expiration_minutes() {
            motion = motion.with_expiration(now + chrono::Duration::minutes(minutes));
        }

        council.count_proposal(principal.id);
        let queued = council.current_motion.is_some();
        if queued {
            council.motion_queue.push_back(motion.clone());
        } else {
            council.current_motion = Some(motion.clone());
        }
        self.store.put(&council).await?;

        info!(
            council = %council_id,
            motion = motion.id,
            queued,
            "motion proposed"
        );
        if !queued {
            self.best_effort(
                "motion-opened notification",
                self.notifier.motion_opened(&council, &motion),
            )
            .await;
        }

        Ok(Proposed { motion, queued })
    }

    /// Record a vote on the current motion. Last write wins per voter.
    ///
    /// After the vote is recorded the early-resolution test runs
    /// synchronously; when it resolves the motion, the full resolve
    /// pipeline completes before this returns.
    pub async fn cast_vote(
        &self,
        council_id: CouncilId,
        principal: &Principal,
        choice: VoteChoice,
        reason: Option<String>,
    ) -> Result<VoteReceipt, EngineError> {
        let lock = self.locks.for_council(council_id);
        let _section = lock.lock().await;

        let mut council = self.load(council_id).await?;
        if council.current_motion.is_none() {
            return Err(DomainError::NoActiveMotion.into());
        }

        if let Some(role) = council.councilor_role()
            && !principal.has_role(role)
        {
            return Err(
                DomainError::Unauthorized("the councilor role is required to vote".to_string())
                    .into(),
            );
        }
        let reason = reason.filter(|r| !r.trim().is_empty());
        if council.reason_required(choice) && reason.is_none() {
            return Err(DomainError::ReasonRequired(choice).into());
        }

        let voter = principal.id;
        let motion = council
            .current_motion
            .as_mut()
            .ok_or(DomainError::NoActiveMotion)?;
        let first_vote = motion.record_vote(voter, choice, reason);
        // Voting clears the miss streak immediately, not only at resolution.
        council.miss_streak.insert(voter, 0);
        if first_vote {
            council.count_vote(voter);
        }

        let mut tally = Tally::default();
        let mut resolved = None;
        match self.roster_snapshot(&council).await {
            Some(members) => {
                let motion = council
                    .current_motion
                    .as_ref()
                    .ok_or(DomainError::NoActiveMotion)?;
                tally = weighted_tally(motion, &council, &members);
                if council.majority_reached_ends() {
                    let eligible = members.iter().filter(|m| council.is_eligible(m)).count();
                    let threshold = motion.majority.threshold();
                    if let Some(status) = early_outcome(&tally, eligible, threshold) {
                        resolved = Some(
                            self.resolve_current(&mut council, status, Some(&members), &tally)
                                .await?,
                        );
                    }
                }
            }
            // Without a roster snapshot the vote still commits; the motion
            // simply stays active until a later vote or sweep can tally it.
            None => debug!(council = %council_id, "vote recorded without tally"),
        }

        if resolved.is_none() {
            self.store.put(&council).await?;
        }
        info!(
            council = %council_id,
            voter = %voter,
            %choice,
            resolved = resolved.is_some(),
            "vote recorded"
        );

        Ok(VoteReceipt { choice, tally, resolved })
    }

    /// Kill the current motion. Author or admin only.
    ///
    /// The resolve pipeline runs, but miss streaks are left untouched.
    pub async fn kill(
        &self,
        council_id: CouncilId,
        principal: &Principal,
    ) -> Result<Motion, EngineError> {
        let lock = self.locks.for_council(council_id);
        let _section = lock.lock().await;

        let mut council = self.load(council_id).await?;
        let motion = council
            .current_motion
            .as_ref()
            .ok_or(DomainError::NoActiveMotion)?;
        if motion.proposer != principal.id && !principal.admin {
            return Err(DomainError::Unauthorized(
                "only the motion author or an admin can kill a motion".to_string(),
            )
            .into());
        }

        // Roster only feeds the final tally announcement here.
        let members = self.roster_snapshot(&council).await;
        let tally = match (&members, &council.current_motion) {
            (Some(members), Some(motion)) => weighted_tally(motion, &council, members),
            _ => Tally::default(),
        };
        let killed = self
            .resolve_current(&mut council, MotionStatus::Killed, members.as_deref(), &tally)
            .await?;
        info!(council = %council_id, motion = killed.id, "motion killed");
        Ok(killed)
    }

    /// Expiration-driven resolution, invoked by the scheduler.
    ///
    /// Resolves the current motion when its expiration has passed,
    /// comparing raw weighted yes vs. no — a distinct policy from early
    /// resolution. Returns the resolved motion, or `None` when nothing was
    /// due.
    pub async fn evaluate_expiration(
        &self,
        council_id: CouncilId,
        now: DateTime<Utc>,
    ) -> Result<Option<Motion>, EngineError> {
        let lock = self.locks.for_council(council_id);
        let _section = lock.lock().await;

        let Some(mut council) = self.store.get(council_id).await? else {
            return Ok(None);
        };
        let Some(motion) = &council.current_motion else {
            return Ok(None);
        };
        if !motion.is_expired_at(now) {
            return Ok(None);
        }

        let Some(members) = self.roster_snapshot(&council).await else {
            // Without a tally the sweep cannot decide; leave the motion for
            // the next pass rather than guessing.
            warn!(council = %council_id, "expiration sweep skipped: no roster snapshot");
            return Ok(None);
        };
        let tally = weighted_tally(motion, &council, &members);
        let status = expiration_outcome(&tally);
        let resolved = self
            .resolve_current(&mut council, status, Some(&members), &tally)
            .await?;
        info!(
            council = %council_id,
            motion = resolved.id,
            outcome = %status,
            "motion expired"
        );
        Ok(Some(resolved))
    }

    // ---- shared internals ----

    pub(crate) async fn load(&self, id: CouncilId) -> Result<Council, EngineError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| DomainError::CouncilNotFound(id).into())
    }

    /// Membership snapshot bounded by the collaborator timeout; `None` on
    /// failure (logged and swallowed, never fatal to the caller's write).
    pub(crate) async fn roster_snapshot(&self, council: &Council) -> Option<Vec<CouncilMember>> {
        match tokio::time::timeout(self.collaborator_timeout, self.roster.members(council)).await
        {
            Ok(Ok(members)) => Some(members),
            Ok(Err(e)) => {
                warn!(council = %council.id, "roster lookup failed: {e}");
                None
            }
            Err(_) => {
                warn!(council = %council.id, "roster lookup timed out");
                None
            }
        }
    }

    /// Run a fallible side effect without letting it fail the operation.
    pub(crate) async fn best_effort<F>(&self, what: &str, effect: F)
    where
        F: Future<Output = Result<(), NotifyError>>,
    {
        match tokio::time::timeout(self.collaborator_timeout, effect).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("{what} failed: {e}"),
            Err(_) => warn!("{what} timed out after {:?}", self.collaborator_timeout),
        }
    }
}
