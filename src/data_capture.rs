pub mod capture_process;
pub mod filename;
pub mod types;

pub use capture_process::{Capturer, StreamlinkCapturer};
pub use types::{CaptureArtifact, CaptureOutcome};
