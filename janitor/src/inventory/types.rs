// File: janitor/src/inventory/types.rs
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::constants::{cleanup, inventory};

/// Lifecycle state reported for a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SnapshotState {
    Pending,
    Completed,
    Error,
    Recoverable,
    Recovering,
    Other(String),
}

impl SnapshotState {
    pub fn is_actionable(&self) -> bool {
        matches!(self, SnapshotState::Completed)
    }
}

impl From<String> for SnapshotState {
    fn from(value: String) -> Self {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "pending" => SnapshotState::Pending,
            s if s == cleanup::ACTIONABLE_STATE => SnapshotState::Completed,
            "error" => SnapshotState::Error,
            "recoverable" => SnapshotState::Recoverable,
            "recovering" => SnapshotState::Recovering,
            _ => SnapshotState::Other(lowered),
        }
    }
}

impl From<SnapshotState> for String {
    fn from(state: SnapshotState) -> Self {
        state.to_string()
    }
}

impl Default for SnapshotState {
    fn default() -> Self {
        SnapshotState::Other(String::new())
    }
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotState::Pending => write!(f, "pending"),
            SnapshotState::Completed => write!(f, "{}", cleanup::ACTIONABLE_STATE),
            SnapshotState::Error => write!(f, "error"),
            SnapshotState::Recoverable => write!(f, "recoverable"),
            SnapshotState::Recovering => write!(f, "recovering"),
            SnapshotState::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Wire form of a single tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEntry {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Unordered tag set; keys are unique
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TagEntry>", into = "Vec<TagEntry>")]
pub struct Tags(HashMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<TagEntry>> for Tags {
    fn from(entries: Vec<TagEntry>) -> Self {
        Tags(entries.into_iter().map(|t| (t.key, t.value)).collect())
    }
}

impl From<Tags> for Vec<TagEntry> {
    fn from(tags: Tags) -> Self {
        tags.0
            .into_iter()
            .map(|(key, value)| TagEntry { key, value })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One snapshot as reported by the inventory service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub snapshot_id: String,
    /// Creation time exactly as reported; see [`normalize_timestamp`]
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: SnapshotState,
    #[serde(default, rename = "volume_size")]
    pub volume_size_gib: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Tags,
}

/// Optional wire fields may be absent or explicitly `null`; both read as empty
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Listing entry that could not be decoded into a [`SnapshotRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedRecord {
    pub snapshot_id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListedSnapshot {
    Record(SnapshotRecord),
    Malformed(MalformedRecord),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPage {
    pub entries: Vec<ListedSnapshot>,
    pub next_token: Option<String>,
}

/// Account scope used for listings and cross-reference lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerScope {
    Account(String),
    /// Whatever account the credentials belong to
    Caller,
}

impl OwnerScope {
    pub fn as_query_value(&self) -> &str {
        match self {
            OwnerScope::Account(id) => id,
            OwnerScope::Caller => inventory::CALLER_OWNER,
        }
    }
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_query_value())
    }
}

/// Managed database instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbInstance {
    pub identifier: String,
    pub arn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Normalize a reported timestamp to UTC.
///
/// Timestamps carrying an offset are converted; naive timestamps are taken as UTC.
pub fn normalize_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))?;
    Ok(Utc.from_utc_datetime(&naive))
}
