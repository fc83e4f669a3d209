use serde::{Deserialize, Serialize};

/// Embed color of start events (green).
pub const COLOR_START: u32 = 0x00FF00;
/// Embed color of stop events (red).
pub const COLOR_STOP: u32 = 0xFF0000;
/// Embed color of error events (yellow).
pub const COLOR_ERROR: u32 = 0xFFFF00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Start,
    Stop,
    Error,
}

impl NotificationKind {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationKind::Start => "Stream Started",
            NotificationKind::Stop => "Stream Stopped",
            NotificationKind::Error => "Stream Error",
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            NotificationKind::Start => COLOR_START,
            NotificationKind::Stop => COLOR_STOP,
            NotificationKind::Error => COLOR_ERROR,
        }
    }
}

/// A lifecycle event about the monitored channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub channel: String,
    pub detail: Option<String>,
}

impl Notification {
    pub fn start(channel: &str) -> Self {
        Self {
            kind: NotificationKind::Start,
            channel: channel.to_string(),
            detail: None,
        }
    }

    pub fn stop(channel: &str) -> Self {
        Self {
            kind: NotificationKind::Stop,
            channel: channel.to_string(),
            detail: None,
        }
    }

    pub fn error(channel: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            channel: channel.to_string(),
            detail: Some(detail.into()),
        }
    }

    /// Markdown body linking the channel page.
    pub fn description(&self) -> String {
        let link = format!("[{0}](https://twitch.tv/{0})", self.channel);
        match self.kind {
            NotificationKind::Start => format!("Stream for {} has started!", link),
            NotificationKind::Stop => format!("Stream for {} has stopped.", link),
            NotificationKind::Error => format!(
                "Stream for {} has encountered an error:\n{}",
                link,
                self.detail.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    pub fn to_payload(&self) -> WebhookPayload {
        WebhookPayload {
            embeds: vec![Embed {
                title: self.kind.title().to_string(),
                description: self.description(),
                color: self.kind.color(),
            }],
        }
    }
}

/// JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let payload = Notification::start("chan").to_payload();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "embeds": [{
                    "title": "Stream Started",
                    "description": "Stream for [chan](https://twitch.tv/chan) has started!",
                    "color": 65280
                }]
            })
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(Notification::start("c").to_payload().embeds[0].color, 0x00FF00);
        assert_eq!(Notification::stop("c").to_payload().embeds[0].color, 0xFF0000);
        assert_eq!(Notification::error("c", "x").to_payload().embeds[0].color, 0xFFFF00);
    }

    #[test]
    fn test_error_description_carries_detail() {
        let notification = Notification::error("chan", "Unauthorized, logging back in");
        assert_eq!(
            notification.description(),
            "Stream for [chan](https://twitch.tv/chan) has encountered an error:\nUnauthorized, logging back in"
        );
    }
}
