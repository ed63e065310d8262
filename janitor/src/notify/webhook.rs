// File: janitor/src/notify/webhook.rs
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{Notification, NotificationSink};
use crate::constants::alerts::WEBHOOK_TIMEOUT_SECONDS;
use crate::errors::NotifyError;

/// Posts notifications as JSON to a webhook; disabled when no URL is configured
#[derive(Clone)]
pub struct WebhookNotifier {
    webhook_url: Option<String>,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url: webhook_url.filter(|url| !url.is_empty()),
            client: Client::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let url = match &self.webhook_url {
            Some(url) => url,
            None => {
                debug!("No webhook URL configured, skipping notification: {}", notification.subject);
                return Ok(());
            }
        };

        match timeout(
            Duration::from_secs(WEBHOOK_TIMEOUT_SECONDS),
            self.client.post(url).json(notification).send(),
        )
        .await
        {
            Ok(Ok(response)) if response.status().is_success() => {
                info!(
                    "Notification sent for {}: {}",
                    notification.resource_id, notification.subject
                );
                Ok(())
            }
            Ok(Ok(response)) => Err(NotifyError::Rejected {
                url: url.clone(),
                status: response.status().as_u16(),
            }),
            Ok(Err(e)) => Err(NotifyError::DeliveryFailed {
                url: url.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(NotifyError::Timeout { url: url.clone() }),
        }
    }
}
