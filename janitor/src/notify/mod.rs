//! Notification sink
//!
//! Jobs report noteworthy events (a snapshot was created or failed) through
//! [`NotificationSink`]. The production sink posts JSON to a webhook.

pub mod webhook;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::NotifyError;

pub use webhook::WebhookNotifier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    SnapshotCreated,
    SnapshotFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub timestamp: DateTime<Utc>,
    pub notification_type: NotificationType,
    pub severity: NotificationSeverity,
    pub subject: String,
    pub message: String,
    pub resource_id: String,
    pub details: Option<serde_json::Value>,
}

impl Notification {
    pub fn new(
        notification_type: NotificationType,
        severity: NotificationSeverity,
        subject: impl Into<String>,
        message: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            notification_type,
            severity,
            subject: subject.into(),
            message: message.into(),
            resource_id: resource_id.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}
