//! Post-processing of finished captures.
//!
//! Each capture ends up in the processed directory one of two ways:
//! - processing disabled: the raw file is moved there untouched;
//! - processing enabled: the transcoder writes a repaired copy there, then the raw file is
//!   deleted.
//!
//! In both cases the raw file disappears only once the destination exists. Any failure
//! leaves the raw file in place so a later startup sweep can try again.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};

use crate::configuration::config::Config;
use crate::data_capture::types::CaptureArtifact;
use crate::error_handling::types::ProcessingError;
use crate::storage::recording_layout::RecordingLayout;

use super::transcoder::{FfmpegTranscoder, Transcoder};

/// Consumer of finished captures.
#[async_trait]
pub trait ArtifactProcessor: Send + Sync {
    async fn process(&self, artifact: &CaptureArtifact) -> Result<(), ProcessingError>;
}

pub struct PostProcessor {
    layout: RecordingLayout,
    transcoder: Arc<dyn Transcoder>,
    processing_enabled: bool,
}

impl PostProcessor {
    pub fn new(layout: RecordingLayout, transcoder: Arc<dyn Transcoder>, processing_enabled: bool) -> Self {
        Self {
            layout,
            transcoder,
            processing_enabled,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.layout(),
            Arc::new(FfmpegTranscoder::new(config.ffmpeg_path.clone())),
            !config.disable_processing,
        )
    }

    /// Creates the raw and processed directories and lists the captures a previous run left
    /// behind.
    ///
    /// Meant to be called before the controller starts, so the returned list can never
    /// contain a capture that is still being written.
    pub async fn prepare_sweep(&self) -> Result<Vec<CaptureArtifact>, ProcessingError> {
        self.layout.prepare().await?;
        Ok(self.layout.pending_captures().await?)
    }

    /// Processes leftover captures one by one. A failure on one file is logged and does not
    /// stop the others. Returns how many were processed successfully.
    pub async fn sweep(&self, pending: Vec<CaptureArtifact>) -> usize {
        if pending.is_empty() {
            debug!("No previously recorded files to process");
            return 0;
        }

        info!("Processing {} previously recorded file(s)", pending.len());
        let mut processed = 0;
        for artifact in &pending {
            match self.process(artifact).await {
                Ok(()) => processed += 1,
                Err(e) => error!("Failed to process {}: {}", artifact.raw.display(), e),
            }
        }
        info!("Startup sweep done: {}/{} file(s) processed", processed, pending.len());
        processed
    }

    async fn repackage(&self, artifact: &CaptureArtifact) -> Result<(), ProcessingError> {
        self.transcoder
            .transcode(&artifact.raw, &artifact.destination)
            .await?;
        tokio::fs::remove_file(&artifact.raw).await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactProcessor for PostProcessor {
    async fn process(&self, artifact: &CaptureArtifact) -> Result<(), ProcessingError> {
        if self.processing_enabled {
            info!("Fixing {}", artifact.raw.display());
            self.repackage(artifact).await?;
        } else {
            info!("Moving {}", artifact.raw.display());
            relocate(&artifact.raw, &artifact.destination).await?;
        }
        debug!("Finished file at {}", artifact.destination.display());
        Ok(())
    }
}

/// Moves `raw` to `destination`, by rename when possible and by copy-then-delete otherwise
/// (e.g. across filesystems). On failure `raw` is left where it was.
pub async fn relocate(raw: &Path, destination: &Path) -> Result<(), ProcessingError> {
    match tokio::fs::rename(raw, destination).await {
        Ok(()) => Ok(()),
        Err(rename_error) => {
            debug!(
                "Rename of {} failed ({}), copying instead",
                raw.display(),
                rename_error
            );
            tokio::fs::copy(raw, destination).await?;
            tokio::fs::remove_file(raw).await?;
            Ok(())
        }
    }
}
