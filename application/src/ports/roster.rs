//! Roster port.
//!
//! The engine never talks to the host platform's member lists directly; it
//! asks a [`Roster`] for the current membership snapshot of a council's
//! community. Members arrive with their role ids, not with weights: weight
//! resolution stays a pure domain function of council config, so an
//! override change retroactively affects open tallies.
//!
//! Implementations return human principals only (the original excluded
//! bots before any eligibility check).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use votum_domain::{Council, CouncilMember, PrincipalId};

/// Errors from roster lookups.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("roster unavailable: {0}")]
    Unavailable(String),
}

/// Port for membership snapshots.
#[async_trait]
pub trait Roster: Send + Sync {
    /// Every member of the council's community, with current roles.
    ///
    /// The caller applies the council's eligibility predicate; this method
    /// must not pre-filter by councilor role.
    async fn members(&self, council: &Council) -> Result<Vec<CouncilMember>, RosterError>;
}

/// Fixed-membership roster for tests and static deployments.
///
/// Roles can be reassigned at runtime; the next snapshot reflects them,
/// which is exactly how live role changes reach open tallies.
#[derive(Default)]
pub struct StaticRoster {
    members: Mutex<HashMap<PrincipalId, CouncilMember>>,
}

impl StaticRoster {
    pub fn new(members: impl IntoIterator<Item = CouncilMember>) -> Self {
        Self {
            members: Mutex::new(members.into_iter().map(|m| (m.id, m)).collect()),
        }
    }

    pub fn upsert(&self, member: CouncilMember) {
        self.members.lock().unwrap().insert(member.id, member);
    }

    pub fn remove(&self, id: PrincipalId) {
        self.members.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl Roster for StaticRoster {
    async fn members(&self, _council: &Council) -> Result<Vec<CouncilMember>, RosterError> {
        let mut members: Vec<_> = self.members.lock().unwrap().values().cloned().collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votum_domain::CouncilId;

    #[tokio::test]
    async fn test_static_roster_snapshot() {
        let roster = StaticRoster::new([
            CouncilMember::new(2).with_roles([10]),
            CouncilMember::new(1),
        ]);
        let council = Council::new(CouncilId::new(1, 1), "c");

        let members = roster.members(&council).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, PrincipalId(1));

        roster.remove(PrincipalId(1));
        assert_eq!(roster.members(&council).await.unwrap().len(), 1);
    }
}
