//! Storage subsystem
//!
//! Captures live on the local filesystem in two per-channel directories: one for raw
//! output of the capture tool and one for finished files.
//!
//! Components:
//! - `recording_layout`: resolves both directories and lists leftover raw captures.

pub mod recording_layout;

pub use recording_layout::RecordingLayout;
