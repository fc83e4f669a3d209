//! Capture of a live stream through an external tool.
//!
//! The recorder does not decode any streaming protocol itself. It hands the channel URL, a
//! quality selector and an output path to `streamlink` and waits until the process exits on
//! its own, which normally happens when the broadcast ends. There is no timeout: a capture
//! runs as long as the stream does, or until the process is killed externally.
//!
//! Output lines of the child are forwarded to the DEBUG log so tool chatter does not drown
//! the recorder's own messages at the default level.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::configuration::config::Config;
use crate::error_handling::types::CaptureError;

use super::types::CaptureOutcome;

/// Something able to record a channel's live stream into a file.
#[async_trait]
pub trait Capturer: Send + Sync {
    /// Records `channel` into `output` and returns once the capture has ended.
    async fn capture(&self, channel: &str, output: &Path) -> Result<CaptureOutcome, CaptureError>;
}

/// [`Capturer`] driving the `streamlink` command-line tool.
#[derive(Debug, Clone)]
pub struct StreamlinkCapturer {
    program: String,
    extra_args: Vec<String>,
    quality: String,
}

impl StreamlinkCapturer {
    pub fn new(program: impl Into<String>, extra_args: Vec<String>, quality: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args,
            quality: quality.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.streamlink_path.clone(),
            config.streamlink_args.clone(),
            config.quality.clone(),
        )
    }

    /// Arguments passed to the tool for one capture.
    pub fn arguments(&self, channel: &str, output: &Path) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.push(format!("twitch.tv/{}", channel));
        args.push(self.quality.clone());
        args.push(String::from("-o"));
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

#[async_trait]
impl Capturer for StreamlinkCapturer {
    async fn capture(&self, channel: &str, output: &Path) -> Result<CaptureOutcome, CaptureError> {
        let args = self.arguments(channel, output);
        debug!("[{}] Spawning {} {:?}", channel, self.program, args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(CaptureError::SpawnFailed)?;

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(format!("{}:stdout", channel), stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(format!("{}:stderr", channel), stderr));
        }

        info!("[{}] Capture running, writing to {}", channel, output.display());
        let status = child.wait().await.map_err(CaptureError::WaitFailed)?;
        let outcome = CaptureOutcome {
            exit_code: status.code(),
        };

        if outcome.success() {
            info!("[{}] Capture process exited cleanly", channel);
        } else {
            warn!("[{}] Capture process exited with {:?}", channel, status);
        }
        Ok(outcome)
    }
}

async fn forward_lines<R: AsyncRead + Unpin>(tag: String, stream: R) {
    let mut reader = BufReader::new(stream).lines();
    while let Ok(Some(line)) = reader.next_line().await {
        debug!("[streamlink:{}] {}", tag, line);
    }
}
