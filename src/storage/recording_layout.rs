use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::data_capture::types::CaptureArtifact;

/// Per-channel directory pair for raw and processed captures.
///
/// Both directories end with the channel login, so several recorders can share the same
/// roots without stepping on each other's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingLayout {
    recorded_dir: PathBuf,
    processed_dir: PathBuf,
}

impl RecordingLayout {
    pub fn new<R: AsRef<Path>, P: AsRef<Path>>(
        recorded_root: R,
        processed_root: P,
        channel: &str,
    ) -> Self {
        Self {
            recorded_dir: recorded_root.as_ref().join(channel),
            processed_dir: processed_root.as_ref().join(channel),
        }
    }

    /// Where the capture tool writes.
    pub fn recorded_dir(&self) -> &Path {
        &self.recorded_dir
    }

    /// Where finished files end up.
    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Creates both directories if they are missing.
    pub async fn prepare(&self) -> io::Result<()> {
        for dir in [&self.recorded_dir, &self.processed_dir] {
            if !tokio::fs::try_exists(dir).await? {
                info!("Creating directory {}", dir.display());
            }
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    /// Raw and destination paths for a capture named `filename`.
    pub fn artifact_for(&self, filename: &str) -> CaptureArtifact {
        CaptureArtifact {
            raw: self.recorded_dir.join(filename),
            destination: self.processed_dir.join(filename),
        }
    }

    /// Lists the regular files currently sitting in the raw directory, sorted by name.
    ///
    /// These are captures a previous run never got to process.
    pub async fn pending_captures(&self) -> io::Result<Vec<CaptureArtifact>> {
        let mut entries = tokio::fs::read_dir(&self.recorded_dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                debug!("Skipping non-file entry {}", entry.path().display());
                continue;
            }
            names.push(entry.file_name());
        }
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| CaptureArtifact {
                raw: self.recorded_dir.join(&name),
                destination: self.processed_dir.join(&name),
            })
            .collect())
    }
}
