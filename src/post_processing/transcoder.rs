use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use crate::error_handling::types::ProcessingError;

/// Repairs and repackages a capture into a new file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Writes a cleaned-up copy of `input` to `output`. Never touches `input`.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), ProcessingError>;
}

/// [`Transcoder`] running `ffmpeg` in stream-copy mode with error-tolerant demuxing.
///
/// No codec is re-encoded: the container is rewritten, which fixes the broken timestamps and
/// truncated tail a live capture usually ends with.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn arguments(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            // a failed earlier attempt may have left a partial output behind
            String::from("-y"),
            String::from("-err_detect"),
            String::from("ignore_err"),
            String::from("-i"),
            input.to_string_lossy().into_owned(),
            String::from("-c"),
            String::from("copy"),
            output.to_string_lossy().into_owned(),
        ]
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        let args = self.arguments(input, output);
        debug!("Running {} {:?}", self.program, args);

        let result = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(ProcessingError::TranscoderSpawn)?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            if let Some(last) = stderr.lines().last() {
                warn!("{} failed on {}: {}", self.program, input.display(), last);
            }
            return Err(ProcessingError::TranscoderFailed(result.status.code()));
        }
        Ok(())
    }
}
