//! The resolve pipeline.
//!
//! One path for every terminal transition — early majority, expiration,
//! kill: archive the motion, update miss streaks, promote the queue head,
//! persist, then fire best-effort announcements. The durable write comes
//! first; announcement or cleanup failures are logged and swallowed.

use super::{EngineError, LifecycleEngine};
use tracing::info;
use votum_domain::{Council, CouncilMember, DomainError, Motion, MotionStatus, Tally};

impl LifecycleEngine {
    /// Resolve the council's current motion to `status`.
    ///
    /// Must be called inside the council's critical section. `members` is
    /// the roster snapshot backing `tally`; when absent (roster failure on
    /// a kill), streak updates are skipped along with it.
    pub(crate) async fn resolve_current(
        &self,
        council: &mut Council,
        status: MotionStatus,
        members: Option<&[CouncilMember]>,
        tally: &Tally,
    ) -> Result<Motion, EngineError> {
        let mut motion = council
            .current_motion
            .take()
            .ok_or(DomainError::NoActiveMotion)?;
        motion.resolve(status, self.clock.now());

        // Killed motions don't count against anyone's attendance.
        if status != MotionStatus::Killed
            && let Some(members) = members
        {
            let eligible: Vec<&CouncilMember> =
                members.iter().filter(|m| council.is_eligible(m)).collect();
            for member in eligible {
                if motion.has_voted(member.id) {
                    council.miss_streak.insert(member.id, 0);
                } else {
                    *council.miss_streak.entry(member.id).or_insert(0) += 1;
                }
            }
        }

        council.archive.push(motion.clone());

        // FIFO promotion happens in the same resolve call. The promoted
        // motion keeps its original expiration — it may already be in the
        // past, in which case the next sweep resolves it immediately.
        let promoted = if council.queue_enabled() {
            council.motion_queue.pop_front()
        } else {
            None
        };
        if let Some(next) = &promoted {
            council.current_motion = Some(next.clone());
            info!(
                council = %council.id,
                motion = next.id,
                "promoted queued motion"
            );
        }

        self.store.put(council).await?;

        // Resolution is final once the write above succeeds; everything
        // below is best-effort.
        self.best_effort(
            "result announcement",
            self.notifier
                .announce_result(council, &motion, status, tally),
        )
        .await;
        if let Some(next) = &promoted {
            self.best_effort(
                "motion-opened notification",
                self.notifier.motion_opened(council, next),
            )
            .await;
        }
        self.best_effort(
            "deliberation cleanup",
            self.notifier
                .cleanup_deliberation(council, &motion, council.keep_transcripts()),
        )
        .await;

        Ok(motion)
    }
}
