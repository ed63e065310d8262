use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::eligibility::SkipReason;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub snapshot_id: Option<String>,
    pub message: String,
}

/// Outcome counters for a single cleanup run; counters only ever grow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub cutoff: DateTime<Utc>,
    pub total_scanned: u64,
    pub eligible: u64,
    pub deleted: u64,
    pub skipped: u64,
    pub errors: u64,
    pub skipped_reasons: BTreeMap<String, u64>,
    pub failures: Vec<FailureRecord>,
}

impl RunStatistics {
    pub fn new(run_id: Uuid, dry_run: bool, cutoff: DateTime<Utc>) -> Self {
        Self {
            run_id,
            dry_run,
            cutoff,
            total_scanned: 0,
            eligible: 0,
            deleted: 0,
            skipped: 0,
            errors: 0,
            skipped_reasons: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_scanned(&mut self) {
        self.total_scanned += 1;
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        self.skipped += 1;
        *self.skipped_reasons.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn record_eligible(&mut self) {
        self.eligible += 1;
    }

    pub fn record_deleted(&mut self) {
        self.deleted += 1;
    }

    pub fn record_error(&mut self, snapshot_id: Option<&str>, message: impl Into<String>) {
        self.errors += 1;
        self.failures.push(FailureRecord {
            snapshot_id: snapshot_id.map(str::to_string),
            message: message.into(),
        });
    }

    pub fn skipped_for(&self, reason: &str) -> u64 {
        self.skipped_reasons.get(reason).copied().unwrap_or(0)
    }
}
