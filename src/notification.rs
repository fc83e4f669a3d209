//! Lifecycle notifications (stream started, stopped, errors) sent to a webhook.

pub mod notifier;
pub mod types;

pub use notifier::{LogNotifier, Notifier, WebhookNotifier};
pub use types::{Notification, NotificationKind};
