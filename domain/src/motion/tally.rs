//! Weighted vote aggregation.

use crate::council::{Council, CouncilMember};
use crate::motion::entities::{Motion, VoteChoice};
use serde::{Deserialize, Serialize};

/// Weighted yes/no/abstain sums for a motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: f64,
    pub no: f64,
    pub abstain: f64,
}

impl Tally {
    pub fn total(&self) -> f64 {
        self.yes + self.no + self.abstain
    }
}

/// Aggregate a motion's votes into a weighted [`Tally`].
///
/// Each recorded vote is scaled by the voter's weight as resolved against
/// the council's current overrides. Voters absent from the roster snapshot
/// are excluded from the sums entirely, even though their historical vote
/// record remains stored on the motion.
pub fn weighted_tally(motion: &Motion, council: &Council, roster: &[CouncilMember]) -> Tally {
    let mut tally = Tally::default();
    for (voter, choice) in &motion.votes {
        let Some(member) = roster.iter().find(|m| m.id == *voter) else {
            continue;
        };
        let w = council.vote_weight(member);
        match choice {
            VoteChoice::Yes => tally.yes += w,
            VoteChoice::No => tally.no += w,
            VoteChoice::Abstain => tally.abstain += w,
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{CouncilId, PrincipalId};
    use crate::motion::Majority;
    use chrono::{TimeZone, Utc};

    fn setup() -> (Council, Motion) {
        let council = Council::new(CouncilId::new(1, 2), "Senate");
        let motion = Motion::new(
            1,
            "m",
            "t",
            PrincipalId(50),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Majority::default(),
        );
        (council, motion)
    }

    #[test]
    fn test_default_weights_sum() {
        let (council, mut motion) = setup();
        motion.record_vote(PrincipalId(1), VoteChoice::Yes, None);
        motion.record_vote(PrincipalId(2), VoteChoice::Yes, None);
        motion.record_vote(PrincipalId(3), VoteChoice::No, None);
        motion.record_vote(PrincipalId(4), VoteChoice::Abstain, None);

        let roster: Vec<_> = (1..=4).map(CouncilMember::new).collect();
        let tally = weighted_tally(&motion, &council, &roster);
        assert_eq!(tally, Tally { yes: 2.0, no: 1.0, abstain: 1.0 });
        assert_eq!(tally.total(), 4.0);
    }

    #[test]
    fn test_roster_absent_voter_excluded() {
        let (council, mut motion) = setup();
        motion.record_vote(PrincipalId(1), VoteChoice::Yes, None);
        motion.record_vote(PrincipalId(2), VoteChoice::Yes, None);

        // Voter 2 has left the roster; their stored vote no longer counts.
        let roster = vec![CouncilMember::new(1)];
        let tally = weighted_tally(&motion, &council, &roster);
        assert_eq!(tally.yes, 1.0);
        assert_eq!(motion.votes.len(), 2);
    }

    #[test]
    fn test_weight_overrides_affect_open_tally() {
        let (mut council, mut motion) = setup();
        motion.record_vote(PrincipalId(1), VoteChoice::Yes, None);
        let roster = vec![CouncilMember::new(1)];

        assert_eq!(weighted_tally(&motion, &council, &roster).yes, 1.0);

        // Weight change applies retroactively: nothing is cached on the vote.
        council.vote_weights.insert(PrincipalId(1), 4);
        assert_eq!(weighted_tally(&motion, &council, &roster).yes, 4.0);
    }
}
