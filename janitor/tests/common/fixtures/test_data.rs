//! Common test data shared across test files

use chrono::{DateTime, Duration, TimeZone, Utc};
use janitor::inventory::{DbInstance, SnapshotRecord, SnapshotState, Tags};

pub const TEST_ACCOUNT: &str = "123456789012";

/// Fixed "now" so ages are deterministic
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// Start time `days` days before [`fixed_now`], in the service's RFC3339 format
pub fn days_ago(days: i64) -> String {
    (fixed_now() - Duration::days(days)).to_rfc3339()
}

/// Builder for snapshot records
pub struct SnapshotBuilder {
    record: SnapshotRecord,
}

impl SnapshotBuilder {
    /// A completed, untagged snapshot `age_days` old
    pub fn completed(snapshot_id: &str, age_days: i64) -> Self {
        Self {
            record: SnapshotRecord {
                snapshot_id: snapshot_id.to_string(),
                start_time: Some(days_ago(age_days)),
                state: SnapshotState::Completed,
                volume_size_gib: Some(8),
                description: format!("test snapshot {}", snapshot_id),
                tags: Tags::new(),
            },
        }
    }

    pub fn state(mut self, state: SnapshotState) -> Self {
        self.record.state = state;
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.record.tags.insert(key, value);
        self
    }

    pub fn start_time(mut self, raw: &str) -> Self {
        self.record.start_time = Some(raw.to_string());
        self
    }

    pub fn no_start_time(mut self) -> Self {
        self.record.start_time = None;
        self
    }

    pub fn build(self) -> SnapshotRecord {
        self.record
    }
}

/// `count` old, completed, untagged snapshots named `{prefix}-{n}`
pub fn old_snapshots(prefix: &str, count: usize) -> Vec<SnapshotRecord> {
    (0..count)
        .map(|n| SnapshotBuilder::completed(&format!("{}-{}", prefix, n), 90).build())
        .collect()
}

pub fn db_instance(identifier: &str, status: &str) -> DbInstance {
    DbInstance {
        identifier: identifier.to_string(),
        arn: format!("arn:aws:rds:eu-west-1:{}:db:{}", TEST_ACCOUNT, identifier),
        status: status.to_string(),
    }
}

/// JSON form of a snapshot as the control plane returns it
pub fn snapshot_json(snapshot_id: &str, age_days: i64) -> serde_json::Value {
    serde_json::json!({
        "snapshot_id": snapshot_id,
        "start_time": days_ago(age_days),
        "state": "completed",
        "volume_size": 8,
        "description": format!("test snapshot {}", snapshot_id),
        "tags": []
    })
}
