//! Expiration scheduler.
//!
//! A single periodic task that walks every stored council and hands the
//! ones with a current motion to [`LifecycleEngine::evaluate_expiration`].
//! Each council is visited under its own lock, one at a time — the sweep
//! never holds a lock across councils, so it can race interactive votes on
//! one council while others proceed. Per-council failures are logged and
//! the sweep continues.

use crate::engine::LifecycleEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default sweep period.
pub const DEFAULT_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Periodic expiration sweeper.
pub struct ExpirationScheduler {
    engine: Arc<LifecycleEngine>,
    period: Duration,
}

impl ExpirationScheduler {
    pub fn new(engine: Arc<LifecycleEngine>) -> Self {
        Self {
            engine,
            period: DEFAULT_SWEEP_PERIOD,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between sweeps: an in-flight resolution
    /// always runs to completion rather than aborting mid-write.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(period = ?self.period, "expiration scheduler started");
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so a fresh start does
        // not race bootstrap writes.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("expiration scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }
    }

    /// One pass over all councils. Public for embeddings that drive their
    /// own timing.
    pub async fn sweep(&self) {
        let councils = match self.engine.list_councils().await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("expiration sweep could not list councils: {e}");
                return;
            }
        };
        debug!(councils = councils.len(), "expiration sweep");

        for id in councils {
            let now = self.engine.now();
            match self.engine.evaluate_expiration(id, now).await {
                Ok(Some(motion)) => {
                    info!(council = %id, motion = motion.id, outcome = %motion.status, "sweep resolved motion");
                }
                Ok(None) => {}
                // One broken council must not starve the rest of the sweep.
                Err(e) => warn!(council = %id, "expiration sweep error: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::ManualClock;
    use crate::ports::notifier::NoNotifier;
    use crate::ports::repository::InMemoryCouncilStore;
    use crate::ports::roster::StaticRoster;
    use crate::engine::ProposeRequest;
    use chrono::{TimeZone, Utc};
    use votum_domain::{CouncilId, CouncilMember, MotionStatus, Principal, VoteChoice};

    fn engine_with_clock() -> (Arc<LifecycleEngine>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        ));
        // Four members: one yes and one no vote stay below both the pass
        // and fail thresholds, so only expiration can resolve.
        let roster = Arc::new(StaticRoster::new((1..=4).map(CouncilMember::new)));
        let engine = Arc::new(LifecycleEngine::new(
            Arc::new(InMemoryCouncilStore::new()),
            roster,
            Arc::new(NoNotifier),
            clock.clone(),
        ));
        (engine, clock)
    }

    #[tokio::test]
    async fn test_sweep_resolves_expired_tie() {
        let (engine, clock) = engine_with_clock();
        let admin = Principal::new(99).as_admin();
        let id = CouncilId::new(1, 1);
        engine.create_council(id, &admin, "Senate").await.unwrap();
        engine
            .propose(id, &Principal::new(1), ProposeRequest::new("tied motion"))
            .await
            .unwrap();
        engine
            .cast_vote(id, &Principal::new(1), VoteChoice::Yes, None)
            .await
            .unwrap();
        engine
            .cast_vote(id, &Principal::new(2), VoteChoice::No, None)
            .await
            .unwrap();

        let scheduler = ExpirationScheduler::new(engine.clone());

        // Not yet due: nothing happens.
        scheduler.sweep().await;
        assert!(engine.stats(id).await.unwrap().has_active_motion);

        clock.advance(chrono::Duration::minutes(1441));
        scheduler.sweep().await;

        let stats = engine.stats(id).await.unwrap();
        assert!(!stats.has_active_motion);
        let archived = engine.archive(id, None).await.unwrap();
        assert_eq!(archived[0].status, MotionStatus::Tied);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancellation() {
        let (engine, _clock) = engine_with_clock();
        let scheduler =
            ExpirationScheduler::new(engine).with_period(Duration::from_millis(10));
        let token = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(token.clone()));

        tokio::time::sleep(Duration::from_millis(30)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler should stop promptly")
            .unwrap();
    }
}
