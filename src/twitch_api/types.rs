//! Types exchanged with the streaming platform.

use std::fmt;

use serde::Deserialize;

/// Outcome of one status check. Closed set: every consumer matches it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The channel has at least one live stream.
    Online,
    /// The channel exists and is not live.
    Offline,
    /// The API answered 404.
    NotFound,
    /// The API rejected the bearer token (401).
    Unauthorized,
    /// Transport failure, unexpected HTTP status or unreadable body.
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Online => "online",
            Status::Offline => "offline",
            Status::NotFound => "not found",
            Status::Unauthorized => "unauthorized",
            Status::Error => "error",
        };
        f.write_str(label)
    }
}

/// Bearer token for API calls.
///
/// Replaced wholesale on refresh. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// One entry of the `data` array of the streams endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamRecord {
    pub title: String,
    pub user_login: Option<String>,
    pub user_name: Option<String>,
    pub game_name: Option<String>,
    pub started_at: Option<String>,
    pub viewer_count: Option<u64>,
}

/// Body of the streams endpoint. `data` is required; a body without it is malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamsResponse {
    pub data: Vec<StreamRecord>,
}

/// What the recorder knows about a live channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// First record of the response, in the API's order
    pub stream: StreamRecord,
    /// Number of records the API returned
    pub stream_count: usize,
}

impl ChannelInfo {
    pub fn title(&self) -> &str {
        &self.stream.title
    }
}

/// Body of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
