// File: janitor/src/snapshot/creator.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::constants::alerts::{SNAPSHOT_CREATED_SUBJECT, SNAPSHOT_FAILED_SUBJECT};
use crate::inventory::SnapshotInventory;
use crate::notify::{Notification, NotificationSeverity, NotificationSink, NotificationType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedSnapshot {
    pub volume_id: String,
    pub snapshot_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeFailure {
    pub volume_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotReport {
    pub requested: usize,
    pub created: Vec<CreatedSnapshot>,
    pub failures: Vec<VolumeFailure>,
    pub notification_failures: usize,
}

pub fn snapshot_description(volume_id: &str, now: DateTime<Utc>) -> String {
    format!(
        "Snapshot of {} on {}",
        volume_id,
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

pub struct SnapshotCreator {
    inventory: Arc<dyn SnapshotInventory>,
    notifier: Arc<dyn NotificationSink>,
}

impl SnapshotCreator {
    pub fn new(inventory: Arc<dyn SnapshotInventory>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            inventory,
            notifier,
        }
    }

    /// Snapshot every volume in order, notifying on success and on failure
    pub async fn create_for_volumes(&self, volume_ids: &[String]) -> SnapshotReport {
        let mut report = SnapshotReport {
            requested: volume_ids.len(),
            ..SnapshotReport::default()
        };

        if volume_ids.is_empty() {
            info!("No volumes requested, nothing to snapshot");
            return report;
        }

        for volume_id in volume_ids {
            let description = snapshot_description(volume_id, Utc::now());

            let notification = match self.inventory.create_snapshot(volume_id, &description).await {
                Ok(snapshot_id) => {
                    info!("Snapshot {} created for volume {}", snapshot_id, volume_id);
                    let notification = Notification::new(
                        NotificationType::SnapshotCreated,
                        NotificationSeverity::Info,
                        SNAPSHOT_CREATED_SUBJECT,
                        format!("Snapshot {} created for volume {}", snapshot_id, volume_id),
                        snapshot_id.clone(),
                    )
                    .with_details(json!({
                        "volume_id": volume_id,
                        "snapshot_id": snapshot_id,
                        "description": description,
                    }));

                    report.created.push(CreatedSnapshot {
                        volume_id: volume_id.clone(),
                        snapshot_id,
                    });
                    notification
                }
                Err(e) => {
                    error!("Failed to create snapshot for volume {}: {}", volume_id, e);
                    report.failures.push(VolumeFailure {
                        volume_id: volume_id.clone(),
                        message: e.to_string(),
                    });

                    Notification::new(
                        NotificationType::SnapshotFailed,
                        NotificationSeverity::Warning,
                        SNAPSHOT_FAILED_SUBJECT,
                        format!("Snapshot creation failed for volume {}: {}", volume_id, e),
                        volume_id.clone(),
                    )
                }
            };

            if let Err(e) = self.notifier.notify(&notification).await {
                warn!("Failed to send snapshot notification for {}: {}", volume_id, e);
                report.notification_failures += 1;
            }
        }

        info!(
            "Snapshot run completed: requested={} created={} failed={}",
            report.requested,
            report.created.len(),
            report.failures.len()
        );
        report
    }
}
