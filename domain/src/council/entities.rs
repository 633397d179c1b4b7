//! Council aggregate: the durable per-channel voting body.

use crate::config::ConfigValue;
use crate::core::ids::{CouncilId, PrincipalId};
use crate::motion::{Majority, Motion, VoteChoice};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Default motion lifetime when `motion.expiration.minutes` is unset (24h).
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 1440;

/// A roster member as seen by the engine: an id plus the roles currently
/// held. Weights are deliberately *not* part of this snapshot — they are
/// derived from council config at tally time, so an override change
/// retroactively affects an open tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouncilMember {
    pub id: PrincipalId,
    pub roles: Vec<PrincipalId>,
}

impl CouncilMember {
    pub fn new(id: u64) -> Self {
        Self {
            id: PrincipalId(id),
            roles: Vec::new(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = u64>) -> Self {
        self.roles = roles.into_iter().map(PrincipalId).collect();
        self
    }
}

/// A per-channel voting body (Aggregate root).
///
/// The whole aggregate is persisted synchronously after every mutating
/// operation; there are no partial writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Council {
    pub id: CouncilId,
    pub name: String,
    /// At most one active motion at any time.
    pub current_motion: Option<Motion>,
    /// FIFO backlog awaiting promotion to current.
    pub motion_queue: VecDeque<Motion>,
    /// Resolved motions in resolution order; read-only once appended.
    pub archive: Vec<Motion>,
    /// Monotonic; never reused, survives deletion of motions.
    pub next_motion_id: u64,
    /// Typed configuration, validated on write against the key registry.
    pub config: BTreeMap<String, ConfigValue>,
    /// Absolute weight overrides, keyed by user or role id.
    pub vote_weights: BTreeMap<PrincipalId, u32>,
    /// Motions proposed, per principal.
    pub proposed_count: BTreeMap<PrincipalId, u32>,
    /// Motions voted on (first vote only), per principal.
    pub voted_count: BTreeMap<PrincipalId, u32>,
    /// Consecutive resolved motions missed, per principal.
    pub miss_streak: BTreeMap<PrincipalId, u32>,
}

impl Council {
    pub fn new(id: CouncilId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            current_motion: None,
            motion_queue: VecDeque::new(),
            archive: Vec::new(),
            next_motion_id: 1,
            config: BTreeMap::new(),
            vote_weights: BTreeMap::new(),
            proposed_count: BTreeMap::new(),
            voted_count: BTreeMap::new(),
            miss_streak: BTreeMap::new(),
        }
    }

    /// Reserve the next motion id.
    pub fn take_motion_id(&mut self) -> u64 {
        let id = self.next_motion_id;
        self.next_motion_id += 1;
        id
    }

    /// Title uniqueness holds across current, queued, and archived motions.
    pub fn title_is_unique(&self, title: &str) -> bool {
        if self
            .current_motion
            .as_ref()
            .is_some_and(|m| m.title == title)
        {
            return false;
        }
        !self.motion_queue.iter().any(|m| m.title == title)
            && !self.archive.iter().any(|m| m.title == title)
    }

    // ---- typed config accessors ----

    fn config_bool(&self, key: &str, default: bool) -> bool {
        match self.config.get(key) {
            Some(ConfigValue::Bool(b)) => *b,
            _ => default,
        }
    }

    // Untagged serde round-trips an Id back as Int; accept both shapes.
    fn config_id(&self, key: &str) -> Option<PrincipalId> {
        match self.config.get(key) {
            Some(ConfigValue::Id(id)) => Some(PrincipalId(*id)),
            Some(ConfigValue::Int(i)) if *i >= 0 => Some(PrincipalId(*i as u64)),
            _ => None,
        }
    }

    /// Motion lifetime in minutes; `None` means motions never expire.
    pub fn expiration_minutes(&self) -> Option<i64> {
        let minutes = match self.config.get("motion.expiration.minutes") {
            Some(ConfigValue::Int(m)) => *m,
            _ => DEFAULT_EXPIRATION_MINUTES,
        };
        (minutes > 0).then_some(minutes)
    }

    /// Default majority for new motions without an explicit override.
    pub fn default_majority(&self) -> Majority {
        match self.config.get("majority.default") {
            Some(ConfigValue::Str(s)) => Majority::new(s.clone()),
            _ => Majority::default(),
        }
    }

    /// Whether a motion may resolve early once the majority is reached.
    pub fn majority_reached_ends(&self) -> bool {
        self.config_bool("majority.reached.ends", true)
    }

    pub fn motion_creation_disabled(&self) -> bool {
        self.config_bool("councilor.motion.disable", false)
    }

    pub fn queue_enabled(&self) -> bool {
        self.config_bool("motion.queue", false)
    }

    pub fn keep_transcripts(&self) -> bool {
        self.config_bool("keep.transcripts", false)
    }

    pub fn propose_role(&self) -> Option<PrincipalId> {
        self.config_id("propose.role")
    }

    pub fn councilor_role(&self) -> Option<PrincipalId> {
        self.config_id("councilor.role")
    }

    pub fn announcement_channel(&self) -> Option<PrincipalId> {
        self.config_id("announcement.channel")
    }

    pub fn announcement_ping_roles(&self) -> Vec<PrincipalId> {
        match self.config.get("announcement.ping.roles") {
            Some(ConfigValue::IdList(ids)) => ids.iter().copied().map(PrincipalId).collect(),
            _ => Vec::new(),
        }
    }

    pub fn reason_required(&self, choice: VoteChoice) -> bool {
        let key = match choice {
            VoteChoice::Yes => "reason.required.yes",
            VoteChoice::No => "reason.required.no",
            VoteChoice::Abstain => "reason.required.abstain",
        };
        self.config_bool(key, false)
    }

    // ---- membership ----

    /// The voter-eligibility predicate: holds the councilor role when one
    /// is configured, otherwise every roster member is eligible.
    pub fn is_eligible(&self, member: &CouncilMember) -> bool {
        match self.councilor_role() {
            Some(role) => member.roles.contains(&role),
            None => true,
        }
    }

    /// Absolute vote weight: user override > sum of role overrides > 1.
    pub fn vote_weight(&self, member: &CouncilMember) -> f64 {
        if let Some(w) = self.vote_weights.get(&member.id) {
            return f64::from(*w);
        }
        let role_sum: u32 = member
            .roles
            .iter()
            .filter_map(|r| self.vote_weights.get(r))
            .sum();
        if role_sum > 0 { f64::from(role_sum) } else { 1.0 }
    }

    /// Bump a principal's proposed-motions counter.
    pub fn count_proposal(&mut self, proposer: PrincipalId) {
        *self.proposed_count.entry(proposer).or_insert(0) += 1;
    }

    /// Bump a principal's voted-motions counter.
    pub fn count_vote(&mut self, voter: PrincipalId) {
        *self.voted_count.entry(voter).or_insert(0) += 1;
    }
}
