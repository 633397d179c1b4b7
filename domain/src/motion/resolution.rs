//! Resolution policies.
//!
//! Two distinct policies decide a motion's fate, and they must not be
//! conflated:
//!
//! - **Early resolution** (vote-driven): threshold test against the *total
//!   eligible roster*, both directions sharing the same denominator. A
//!   low-turnout motion can stay active until expiration intervenes.
//! - **Expiration** (timer-driven): raw weighted yes vs. no, no threshold;
//!   an exact tie resolves to `Tied`.

use crate::motion::entities::MotionStatus;
use crate::motion::tally::Tally;

/// Early-resolution test, run synchronously after each recorded vote.
///
/// `eligible` is the count of roster members satisfying the council's
/// eligibility predicate; callers floor it at 1. Returns `None` while the
/// motion should remain active.
pub fn early_outcome(tally: &Tally, eligible: usize, threshold: f64) -> Option<MotionStatus> {
    let eligible = eligible.max(1) as f64;
    if tally.yes / eligible >= threshold {
        Some(MotionStatus::Passed)
    } else if tally.no / eligible >= 1.0 - threshold {
        Some(MotionStatus::Failed)
    } else {
        None
    }
}

/// Expiration-driven outcome: raw weighted yes vs. no, ties allowed.
pub fn expiration_outcome(tally: &Tally) -> MotionStatus {
    if tally.yes > tally.no {
        MotionStatus::Passed
    } else if tally.no > tally.yes {
        MotionStatus::Failed
    } else {
        MotionStatus::Tied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(yes: f64, no: f64) -> Tally {
        Tally { yes, no, abstain: 0.0 }
    }

    #[test]
    fn test_pass_boundary_is_inclusive() {
        // eligible = 10, threshold = 0.5: exactly 5 weighted yes passes.
        assert_eq!(
            early_outcome(&tally(5.0, 0.0), 10, 0.5),
            Some(MotionStatus::Passed)
        );
        assert_eq!(early_outcome(&tally(4.9, 0.0), 10, 0.5), None);
    }

    #[test]
    fn test_fail_uses_same_denominator() {
        // threshold 2/3: failure needs no/eligible >= 1/3.
        let t = 2.0 / 3.0;
        assert_eq!(
            early_outcome(&tally(0.0, 2.0), 6, t),
            Some(MotionStatus::Failed)
        );
        assert_eq!(early_outcome(&tally(0.0, 1.9), 6, t), None);
    }

    #[test]
    fn test_low_turnout_stays_active() {
        assert_eq!(early_outcome(&tally(1.0, 1.0), 10, 0.5), None);
    }

    #[test]
    fn test_eligible_floored_at_one() {
        assert_eq!(
            early_outcome(&tally(1.0, 0.0), 0, 0.5),
            Some(MotionStatus::Passed)
        );
    }

    #[test]
    fn test_expiration_tie_never_passes() {
        assert_eq!(expiration_outcome(&tally(3.0, 3.0)), MotionStatus::Tied);
        assert_eq!(expiration_outcome(&tally(0.0, 0.0)), MotionStatus::Tied);
    }

    #[test]
    fn test_expiration_raw_comparison() {
        assert_eq!(expiration_outcome(&tally(2.0, 1.0)), MotionStatus::Passed);
        assert_eq!(expiration_outcome(&tally(1.0, 2.0)), MotionStatus::Failed);
    }
}
