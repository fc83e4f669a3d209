//! Post-processing of captured files: relocation or repair through the transcoder, and
//! the startup sweep over captures left behind by a previous run.

pub mod post_processor;
pub mod transcoder;

pub use post_processor::{ArtifactProcessor, PostProcessor};
pub use transcoder::{FfmpegTranscoder, Transcoder};
