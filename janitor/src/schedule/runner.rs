// File: janitor/src/schedule/runner.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::window::{desired_action, BusinessHours, PowerAction};
use crate::config::ScheduleSettings;
use crate::inventory::{DatabaseFleet, DbInstance};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceFailure {
    pub identifier: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub action: PowerAction,
    pub local_time: String,
    pub matched: usize,
    pub started: Vec<String>,
    pub stopped: Vec<String>,
    pub already_in_state: Vec<String>,
    pub failures: Vec<InstanceFailure>,
}

impl ScheduleReport {
    fn new(action: PowerAction, local_time: String) -> Self {
        Self {
            action,
            local_time,
            matched: 0,
            started: Vec::new(),
            stopped: Vec::new(),
            already_in_state: Vec::new(),
            failures: Vec::new(),
        }
    }
}

pub struct DatabaseScheduler {
    fleet: Arc<dyn DatabaseFleet>,
    settings: ScheduleSettings,
}

impl DatabaseScheduler {
    pub fn new(fleet: Arc<dyn DatabaseFleet>, settings: ScheduleSettings) -> Self {
        Self { fleet, settings }
    }

    pub async fn run(&self) -> ScheduleReport {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> ScheduleReport {
        let local_now = now.with_timezone(&self.settings.timezone);
        let action = desired_action(&local_now, &BusinessHours::from(&self.settings));
        let mut report = ScheduleReport::new(action, local_now.to_rfc3339());

        info!(
            "Database schedule at {} ({}): {} instances tagged {}={}",
            local_now, self.settings.timezone.name(), action, self.settings.tag_key, self.settings.tag_value
        );

        let instances = self.tagged_instances().await;
        report.matched = instances.len();

        for instance in instances {
            if action.satisfied_by(&instance.status) {
                debug!("RDS {} already {}, nothing to do", instance.identifier, instance.status);
                report.already_in_state.push(instance.identifier);
                continue;
            }

            let result = match action {
                PowerAction::Start => {
                    info!("Starting RDS {}...", instance.identifier);
                    self.fleet.start_db_instance(&instance.identifier).await
                }
                PowerAction::Stop(_) => {
                    info!("Stopping RDS {} ({})...", instance.identifier, action);
                    self.fleet.stop_db_instance(&instance.identifier).await
                }
            };

            match result {
                Ok(()) if action == PowerAction::Start => report.started.push(instance.identifier),
                Ok(()) => report.stopped.push(instance.identifier),
                Err(e) => {
                    warn!("Failed to {} RDS {}: {}", action, instance.identifier, e);
                    report.failures.push(InstanceFailure {
                        identifier: instance.identifier,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Database schedule completed: matched={} started={} stopped={} unchanged={} failed={}",
            report.matched,
            report.started.len(),
            report.stopped.len(),
            report.already_in_state.len(),
            report.failures.len()
        );
        report
    }

    /// Instances whose selector tag equals the configured value (exact match)
    pub async fn tagged_instances(&self) -> Vec<DbInstance> {
        let instances = match self.fleet.list_db_instances().await {
            Ok(instances) => instances,
            Err(e) => {
                error!("Error fetching RDS instances: {}", e);
                return Vec::new();
            }
        };

        let mut tagged = Vec::new();
        for instance in instances {
            match self.fleet.list_db_tags(&instance.arn).await {
                Ok(tags) => {
                    if tags.get(&self.settings.tag_key).unwrap_or("") == self.settings.tag_value {
                        tagged.push(instance);
                    }
                }
                Err(e) => {
                    warn!("Skipping RDS {}: failed to list tags: {}", instance.identifier, e);
                }
            }
        }
        tagged
    }
}
