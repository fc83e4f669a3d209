//! Delivery of lifecycle notifications.
//!
//! Notifications are a best-effort side channel. [`Notifier::notify`] never blocks and never
//! fails: the webhook implementation pushes onto a queue drained by a background task, and
//! delivery problems only show up in the log. Events go out one at a time in the order they
//! were queued, so a Stop can never overtake the Start before it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::configuration::config::Config;
use crate::error_handling::types::NotifyError;

use super::types::Notification;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Queues `notification` for delivery and returns immediately.
    fn notify(&self, notification: Notification);

    /// Stops accepting notifications and waits up to `grace` for queued ones to go out.
    async fn shutdown(&self, _grace: Duration) {}
}

/// Notifier used when no webhook is configured: events are only logged.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        info!(
            "[{}] {}: {}",
            notification.channel,
            notification.kind.title(),
            notification.description()
        );
    }
}

/// Posts Discord-style embeds to a webhook from a background task.
pub struct WebhookNotifier {
    sender: Mutex<Option<UnboundedSender<Notification>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WebhookNotifier {
    /// Builds the HTTP client and starts the delivery task. Must run inside a tokio runtime.
    pub fn spawn(url: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::ClientBuild(e.to_string()))?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = tokio::spawn(deliver_queued(client, url.to_string(), receiver));
        debug!("Webhook notifier started");

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn notify(&self, notification: Notification) {
        info!(
            "[{}] Queueing '{}' notification",
            notification.channel,
            notification.kind.title()
        );
        let guard = match self.sender.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_ref() {
            Some(sender) => {
                if sender.send(notification).is_err() {
                    warn!("Webhook worker is gone, notification dropped");
                }
            }
            None => warn!("Notifier already shut down, notification dropped"),
        }
    }

    async fn shutdown(&self, grace: Duration) {
        // Dropping the sender ends the worker once the queue is drained
        drop(match self.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        });
        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(worker) = worker {
            match tokio::time::timeout(grace, worker).await {
                Ok(_) => debug!("Webhook notifier drained"),
                Err(_) => warn!("Pending notifications not delivered within {:?}", grace),
            }
        }
    }
}

async fn deliver_queued(client: Client, url: String, mut receiver: UnboundedReceiver<Notification>) {
    while let Some(notification) = receiver.recv().await {
        if let Err(e) = deliver(&client, &url, &notification).await {
            warn!(
                "[{}] '{}' notification not delivered: {}",
                notification.channel,
                notification.kind.title(),
                e
            );
        }
    }
}

async fn deliver(client: &Client, url: &str, notification: &Notification) -> Result<(), NotifyError> {
    let response = client
        .post(url)
        .json(&notification.to_payload())
        .send()
        .await
        .map_err(|e| NotifyError::Delivery(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(NotifyError::Delivery(format!("HTTP {}", status)));
    }
    debug!("[{}] '{}' notification delivered", notification.channel, notification.kind.title());
    Ok(())
}

/// Webhook notifier when a URL is configured, log-only notifier otherwise.
pub fn from_config(config: &Config) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config.webhook_url() {
        Some(url) => Ok(Arc::new(WebhookNotifier::spawn(url, config.request_timeout())?)),
        None => {
            info!("No webhook configured, notifications will only be logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}
