//! Notifier port.
//!
//! Lifecycle announcements are best-effort side effects: a motion's
//! resolution is a durable fact the moment the aggregate is persisted, and
//! a downstream announcement failure must never un-resolve it. The engine
//! wraps every call in a timeout and logs-and-swallows errors.

use async_trait::async_trait;
use thiserror::Error;
use votum_domain::{Council, Motion, MotionStatus, Tally};

/// Errors from announcement delivery.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notification failed: {0}")]
    Delivery(String),
}

/// Port for lifecycle announcements and deliberation housekeeping.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A motion became current: fresh proposal or queue promotion.
    async fn motion_opened(&self, council: &Council, motion: &Motion) -> Result<(), NotifyError>;

    /// A motion reached a terminal status; `tally` is the final weighted
    /// tally used for the decision.
    async fn announce_result(
        &self,
        council: &Council,
        motion: &Motion,
        outcome: MotionStatus,
        tally: &Tally,
    ) -> Result<(), NotifyError>;

    /// Clean up the external deliberation surface for a resolved motion.
    ///
    /// When `keep_transcripts` is set the implementation retains the thread
    /// and exports a transcript instead of deleting it.
    async fn cleanup_deliberation(
        &self,
        council: &Council,
        motion: &Motion,
        keep_transcripts: bool,
    ) -> Result<(), NotifyError>;
}

/// No-op implementation for tests and headless embeddings.
pub struct NoNotifier;

#[async_trait]
impl Notifier for NoNotifier {
    async fn motion_opened(&self, _: &Council, _: &Motion) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn announce_result(
        &self,
        _: &Council,
        _: &Motion,
        _: MotionStatus,
        _: &Tally,
    ) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn cleanup_deliberation(
        &self,
        _: &Council,
        _: &Motion,
        _: bool,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
