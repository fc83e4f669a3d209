//! Streaming platform API.
//!
//! - `credentials`: access-token acquisition (client-credentials grant).
//! - `status_classifier`: one status check per poll, mapped into [`Status`].
//! - `types`: wire and domain types shared by both.

pub mod credentials;
pub mod status_classifier;
pub mod types;

pub use credentials::{ClientCredentialsProvider, CredentialProvider};
pub use status_classifier::{HelixStatusClassifier, StatusSource};
pub use types::{ChannelInfo, Credential, Status};
