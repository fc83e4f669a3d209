//! Recording controller.
//!
//! Owns the polling loop: one status check per tick, notifications on stream start and
//! stop, and a capture followed by post-processing whenever the channel is live.
//!
//! Re-exports:
//! - [`Controller`]: the state machine itself.
//! - [`Collaborators`]: the external services it drives, injectable for tests.

pub mod controller_handler;

pub use controller_handler::{Collaborators, Controller};
