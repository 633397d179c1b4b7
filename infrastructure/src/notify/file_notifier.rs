//! Tracing + transcript-file notifier.
//!
//! Lifecycle events are emitted as structured tracing records carrying the
//! council's configured announcement channel and ping roles, so a host
//! adapter (or just the log) can relay them. Deliberation cleanup honours
//! `keep.transcripts` by exporting the resolved motion, its votes, and its
//! reasons to a JSON file instead of discarding them.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use votum_application::ports::notifier::{Notifier, NotifyError};
use votum_domain::{Council, Motion, MotionStatus, Tally};

/// Announcement record exported for a resolved motion.
#[derive(Debug, Serialize)]
struct Transcript<'a> {
    council: String,
    exported_at: String,
    motion: &'a Motion,
}

/// [`Notifier`] writing transcripts under a directory and announcing
/// everything else through tracing.
pub struct FileNotifier {
    transcript_dir: PathBuf,
}

impl FileNotifier {
    pub fn new(transcript_dir: impl AsRef<Path>) -> Self {
        Self {
            transcript_dir: transcript_dir.as_ref().to_path_buf(),
        }
    }

    fn transcript_path(&self, council: &Council, motion: &Motion) -> PathBuf {
        self.transcript_dir
            .join(format!("deliberation_{}_{}.json", council.id, motion.id))
    }

    fn write_transcript(&self, council: &Council, motion: &Motion) -> Result<PathBuf, NotifyError> {
        let transcript = Transcript {
            council: council.id.storage_key(),
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            motion,
        };
        let bytes = serde_json::to_vec_pretty(&transcript)
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        fs::create_dir_all(&self.transcript_dir)
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        let path = self.transcript_path(council, motion);
        fs::write(&path, bytes).map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(path)
    }
}

#[async_trait]
impl Notifier for FileNotifier {
    async fn motion_opened(&self, council: &Council, motion: &Motion) -> Result<(), NotifyError> {
        info!(
            council = %council.id,
            motion = motion.id,
            title = %motion.title,
            channel = ?council.announcement_channel(),
            "motion opened for deliberation"
        );
        Ok(())
    }

    async fn announce_result(
        &self,
        council: &Council,
        motion: &Motion,
        outcome: MotionStatus,
        tally: &Tally,
    ) -> Result<(), NotifyError> {
        info!(
            council = %council.id,
            motion = motion.id,
            title = %motion.title,
            %outcome,
            yes = tally.yes,
            no = tally.no,
            abstain = tally.abstain,
            channel = ?council.announcement_channel(),
            ping = ?council.announcement_ping_roles(),
            "motion resolved"
        );
        Ok(())
    }

    async fn cleanup_deliberation(
        &self,
        council: &Council,
        motion: &Motion,
        keep_transcripts: bool,
    ) -> Result<(), NotifyError> {
        if keep_transcripts {
            let path = self.write_transcript(council, motion)?;
            info!(
                council = %council.id,
                motion = motion.id,
                path = %path.display(),
                "deliberation transcript exported"
            );
        } else {
            info!(
                council = %council.id,
                motion = motion.id,
                "deliberation discarded"
            );
        }
        Ok(())
    }
}
