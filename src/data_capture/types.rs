//! Common data types used across the data_capture subsystem.

use std::path::PathBuf;

/// A finished (or leftover) capture waiting for post-processing.
///
/// The raw file is only removed by the post-processor once `destination` has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureArtifact {
    /// File written by the capture tool
    pub raw: PathBuf,
    /// Where the finished file goes
    pub destination: PathBuf,
}

/// How a capture process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CaptureOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
