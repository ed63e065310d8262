//! Wiring between settings, the control-plane client and the jobs

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cleanup::{self, RunStatistics};
use crate::config::{RunOverride, Settings};
use crate::errors::JanitorError;
use crate::inventory::HttpInventoryClient;
use crate::notify::WebhookNotifier;
use crate::schedule::{DatabaseScheduler, ScheduleReport};
use crate::snapshot::{SnapshotCreator, SnapshotReport};

pub struct Janitor {
    settings: Arc<Settings>,
    client: Arc<HttpInventoryClient>,
    notifier: Arc<WebhookNotifier>,
}

impl Janitor {
    pub fn connect(settings: Arc<Settings>) -> Result<Self, JanitorError> {
        let client = Arc::new(HttpInventoryClient::new(&settings.inventory)?);
        let notifier = Arc::new(WebhookNotifier::new(settings.alerts.webhook_url.clone()));

        if notifier.is_enabled() {
            info!("Notifications enabled: {}", notifier.webhook_url().unwrap_or_default());
        } else {
            warn!("No ALERT_WEBHOOK_URL configured, notifications are disabled");
        }

        Ok(Self {
            settings,
            client,
            notifier,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Stale snapshot cleanup; `event` may carry `retention_days` / `dry_run` overrides
    pub async fn cleanup(&self, event: &Value) -> RunStatistics {
        let run_override = RunOverride::from_event(event);
        cleanup::handle(
            &self.settings.cleanup,
            &run_override,
            self.client.clone(),
            self.client.as_ref(),
        )
        .await
    }

    pub async fn snapshot(&self, volume_ids: &[String]) -> SnapshotReport {
        SnapshotCreator::new(self.client.clone(), self.notifier.clone())
            .create_for_volumes(volume_ids)
            .await
    }

    pub async fn schedule(&self) -> ScheduleReport {
        DatabaseScheduler::new(self.client.clone(), self.settings.database_schedule.clone())
            .run()
            .await
    }
}
