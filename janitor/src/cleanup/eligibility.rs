// File: janitor/src/cleanup/eligibility.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CleanupSettings;
use crate::errors::CleanupError;
use crate::inventory::{normalize_timestamp, SnapshotRecord, SnapshotState, Tags};

/// Tag that unconditionally protects a snapshot from deletion.
///
/// The key is compared exactly and the value case-insensitively. An empty value
/// means the key alone is enough to protect the snapshot.
// NOTE: key/value case asymmetry is the observed behaviour of the cleanup job; confirm with
// account owners before aligning the key comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub key: String,
    pub value: String,
}

impl ExclusionRule {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, tags: &Tags) -> bool {
        match tags.get(&self.key) {
            Some(_) if self.value.is_empty() => true,
            Some(value) => value.to_lowercase() == self.value.to_lowercase(),
            None => false,
        }
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Retention, dry-run and exclusion settings for one cleanup run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupPolicy {
    pub retention_days: u32,
    pub dry_run: bool,
    pub exclusion: ExclusionRule,
}

impl From<&CleanupSettings> for CleanupPolicy {
    fn from(settings: &CleanupSettings) -> Self {
        Self {
            retention_days: settings.retention_days,
            dry_run: settings.dry_run,
            exclusion: ExclusionRule::new(
                settings.exclude_tag_key.clone(),
                settings.exclude_tag_value.clone(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    State(SnapshotState),
    NoStartTime,
    TooRecent(DateTime<Utc>),
    ExcludedByTag(ExclusionRule),
    Referenced,
    /// Dependents could not be listed; treated as referenced
    ReferenceUnknown,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::State(state) => write!(f, "state={}", state),
            SkipReason::NoStartTime => write!(f, "no start time"),
            SkipReason::TooRecent(start) => {
                write!(f, "age less than retention ({})", start.to_rfc3339())
            }
            SkipReason::ExcludedByTag(rule) => write!(f, "excluded by tag {}", rule),
            SkipReason::Referenced => write!(f, "referenced by image"),
            SkipReason::ReferenceUnknown => write!(f, "referenced (dependent lookup failed)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Eligible,
    Skip(SkipReason),
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible)
    }

    pub fn reason(&self) -> String {
        match self {
            Verdict::Eligible => "eligible".to_string(),
            Verdict::Skip(reason) => reason.to_string(),
        }
    }
}

/// Checks that need nothing but the record itself: state, start time, age, exclusion tag.
///
/// Returns the first failing check, or `None` when the record still needs the
/// cross-reference check. A start time that is present but unreadable is an error.
pub fn check_record(
    record: &SnapshotRecord,
    cutoff: DateTime<Utc>,
    rule: &ExclusionRule,
) -> Result<Option<SkipReason>, CleanupError> {
    if !record.state.is_actionable() {
        return Ok(Some(SkipReason::State(record.state.clone())));
    }

    let raw_start = match record.start_time.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(Some(SkipReason::NoStartTime)),
    };

    let start_time = normalize_timestamp(raw_start).map_err(|e| CleanupError::MalformedRecord {
        snapshot_id: Some(record.snapshot_id.clone()),
        reason: format!("unreadable start time {:?}: {}", raw_start, e),
    })?;

    if start_time >= cutoff {
        return Ok(Some(SkipReason::TooRecent(start_time)));
    }

    if rule.matches(&record.tags) {
        return Ok(Some(SkipReason::ExcludedByTag(rule.clone())));
    }

    Ok(None)
}
