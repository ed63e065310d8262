//! Default values and fixed limits, grouped by job

use std::time::Duration;

/// Stale snapshot cleanup defaults
pub mod cleanup {
    /// Snapshots older than this many days are deletion candidates
    pub const DEFAULT_RETENTION_DAYS: u32 = 30;

    /// Upper bound accepted for a retention window (one hundred years)
    pub const MAX_RETENTION_DAYS: u32 = 36_500;

    /// Cleanup only simulates deletion unless told otherwise
    pub const DEFAULT_DRY_RUN: bool = true;

    /// Tag key that protects a snapshot from deletion
    pub const DEFAULT_EXCLUDE_TAG_KEY: &str = "Keep";

    /// Tag value that protects a snapshot from deletion
    pub const DEFAULT_EXCLUDE_TAG_VALUE: &str = "true";

    /// The only lifecycle state a snapshot can be deleted from
    pub const ACTIONABLE_STATE: &str = "completed";
}

/// Control-plane client constants
pub mod inventory {
    use super::Duration;

    /// Base URL used when nothing is configured
    pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

    /// Per-request timeout for control-plane calls
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Owner value that scopes listings to the caller's own account
    pub const CALLER_OWNER: &str = "self";
}

/// Notification sink constants
pub mod alerts {
    /// Webhook request timeout
    pub const WEBHOOK_TIMEOUT_SECONDS: u64 = 10;

    /// Subject used for snapshot creation notifications
    pub const SNAPSHOT_CREATED_SUBJECT: &str = "Snapshot Created";

    pub const SNAPSHOT_FAILED_SUBJECT: &str = "Snapshot Failed";
}

/// Database power schedule defaults
pub mod schedule {
    pub const DEFAULT_TAG_KEY: &str = "Environment";
    pub const DEFAULT_TAG_VALUE: &str = "Production";

    /// First hour (inclusive) of business hours on weekdays
    pub const BUSINESS_HOURS_START: u32 = 6;

    /// Last hour (exclusive) of business hours on weekdays
    pub const BUSINESS_HOURS_END: u32 = 18;
}
