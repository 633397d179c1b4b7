//! Read-only council queries: statistics, archive views, exports.
//!
//! Queries read the last committed snapshot from the store; they take no
//! lock and never mutate. Archived motions are immutable, so a returned
//! view can never go stale retroactively.

use super::{EngineError, LifecycleEngine};
use serde::Serialize;
use votum_domain::{CouncilId, DomainError, Motion, PrincipalId};

/// Leaderboard depth for stats views.
const TOP_N: usize = 5;

/// Summary statistics for a council.
#[derive(Debug, Clone, Serialize)]
pub struct CouncilStats {
    pub name: String,
    pub has_active_motion: bool,
    pub queued: usize,
    pub archived: usize,
    /// Top proposers, `(principal, count)` by count descending.
    pub top_proposers: Vec<(PrincipalId, u32)>,
    /// Top voters, same ordering.
    pub top_voters: Vec<(PrincipalId, u32)>,
    /// Everyone with a positive consecutive-miss streak.
    pub miss_streaks: Vec<(PrincipalId, u32)>,
}

impl LifecycleEngine {
    /// Council statistics: activity, leaderboards, miss streaks.
    pub async fn stats(&self, id: CouncilId) -> Result<CouncilStats, EngineError> {
        let council = self.load(id).await?;
        Ok(CouncilStats {
            name: council.name.clone(),
            has_active_motion: council.current_motion.is_some(),
            queued: council.motion_queue.len(),
            archived: council.archive.len(),
            top_proposers: top_n(&council.proposed_count),
            top_voters: top_n(&council.voted_count),
            miss_streaks: {
                let mut streaks: Vec<_> = council
                    .miss_streak
                    .iter()
                    .filter(|(_, n)| **n > 0)
                    .map(|(id, n)| (*id, *n))
                    .collect();
                streaks.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
                streaks
            },
        })
    }

    /// Archived motions, optionally restricted to an inclusive id range.
    /// Without a range, the five most recently resolved motions.
    pub async fn archive(
        &self,
        id: CouncilId,
        range: Option<(u64, u64)>,
    ) -> Result<Vec<Motion>, EngineError> {
        let council = self.load(id).await?;
        let motions = match range {
            Some((a, b)) => {
                let (lo, hi) = (a.min(b), a.max(b));
                council
                    .archive
                    .iter()
                    .filter(|m| (lo..=hi).contains(&m.id))
                    .cloned()
                    .collect()
            }
            None => council
                .archive
                .iter()
                .rev()
                .take(TOP_N)
                .rev()
                .cloned()
                .collect(),
        };
        Ok(motions)
    }

    /// Full aggregate export as JSON, e.g. for an archive attachment.
    pub async fn export(&self, id: CouncilId) -> Result<serde_json::Value, EngineError> {
        let council = self.load(id).await?;
        serde_json::to_value(&council)
            .map_err(|e| EngineError::Store(crate::ports::repository::StoreError::Encoding(e)))
    }

    /// Eligible members who have not yet voted on the current motion.
    pub async fn lazy_voters(&self, id: CouncilId) -> Result<Vec<PrincipalId>, EngineError> {
        let council = self.load(id).await?;
        let motion = council
            .current_motion
            .as_ref()
            .ok_or(DomainError::NoActiveMotion)?;
        let Some(members) = self.roster_snapshot(&council).await else {
            return Ok(Vec::new());
        };
        Ok(members
            .iter()
            .filter(|m| council.is_eligible(m) && !motion.has_voted(m.id))
            .map(|m| m.id)
            .collect())
    }
}

fn top_n(counts: &std::collections::BTreeMap<PrincipalId, u32>) -> Vec<(PrincipalId, u32)> {
    let mut pairs: Vec<_> = counts.iter().map(|(id, n)| (*id, *n)).collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    pairs.truncate(TOP_N);
    pairs
}
