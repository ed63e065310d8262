//! Invocation overrides for a single cleanup run
//!
//! A caller may pass `{"retention_days": 60, "dry_run": false}`. Environment
//! values that were set explicitly always win over the override, and an override
//! value that cannot be interpreted is logged and ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{parse_bool, CleanupSettings};
use crate::constants::cleanup::MAX_RETENTION_DAYS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunOverride {
    pub retention_days: Option<Value>,
    pub dry_run: Option<Value>,
}

impl RunOverride {
    /// Build an override from an arbitrary invocation event; non-objects carry no override
    pub fn from_event(event: &Value) -> Self {
        match event {
            Value::Object(map) => Self {
                retention_days: map.get("retention_days").cloned(),
                dry_run: map.get("dry_run").cloned(),
            },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.retention_days.is_none() && self.dry_run.is_none()
    }
}

impl CleanupSettings {
    /// Effective settings for one run: environment > override > file > defaults
    pub fn merge_override(&self, run_override: &RunOverride) -> CleanupSettings {
        let mut merged = self.clone();

        if let Some(raw) = &run_override.retention_days {
            if self.pinned.retention_days {
                warn!("Ignoring retention_days override {}: RETENTION_DAYS is set", raw);
            } else {
                match override_retention_days(raw) {
                    Some(days) => merged.retention_days = days,
                    None => warn!("Invalid event retention_days {}", raw),
                }
            }
        }

        if let Some(raw) = &run_override.dry_run {
            if self.pinned.dry_run {
                warn!("Ignoring dry_run override {}: DRY_RUN is set", raw);
            } else {
                match override_dry_run(raw) {
                    Some(dry_run) => merged.dry_run = dry_run,
                    None => warn!("Invalid event dry_run {}", raw),
                }
            }
        }

        merged
    }
}

fn override_retention_days(raw: &Value) -> Option<u32> {
    let days = match raw {
        Value::Number(n) => n.as_u64().and_then(|days| u32::try_from(days).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    days.filter(|days| *days <= MAX_RETENTION_DAYS)
}

fn override_dry_run(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => parse_bool(s),
        _ => None,
    }
}
