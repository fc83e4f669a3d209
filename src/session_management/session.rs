use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A live broadcast of the monitored channel, as seen by the controller.
///
/// Created when the channel is first seen online and dropped when a later poll reports it
/// offline. A session can span several captures if the capture tool exits while the
/// channel is still live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSession {
    /// Correlates log lines of one broadcast
    pub id: Uuid,
    pub channel: String,
    /// First title seen for this broadcast
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub captures: u32,
}

impl StreamSession {
    pub fn new(channel: &str, title: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            title: title.to_string(),
            started_at: Utc::now(),
            captures: 0,
        }
    }

    /// Session start with date granularity, e.g. `20240309`.
    pub fn start_date(&self) -> String {
        self.started_at.format("%Y%m%d").to_string()
    }
}
