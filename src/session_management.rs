//! Live session tracking.
//!
//! The controller keeps at most one [`StreamSession`] for the monitored channel. Its
//! presence is what separates the two recorder states.

/// Submodule for the session data structure.
pub mod session;

pub use session::StreamSession;

/// Represents the state of the recording controller.
///
/// Variants:
/// - `Idle`: no live session is known.
/// - `Live`: a session is active; captures run synchronously, so this also covers
///   "capturing".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Live,
}
