pub mod app;
pub mod cleanup;
pub mod config;
pub mod constants;
pub mod errors;
pub mod inventory;
pub mod notify;
pub mod schedule;
pub mod snapshot;

// Re-export commonly used types
pub use app::Janitor;
pub use cleanup::{CleanupEngine, CleanupPolicy, ExclusionRule, RunStatistics, Verdict};
pub use config::{ConfigManager, RunOverride, Settings};
pub use errors::JanitorError;
pub use inventory::{HttpInventoryClient, OwnerScope, SnapshotRecord};
pub use notify::WebhookNotifier;
pub use schedule::DatabaseScheduler;
pub use snapshot::SnapshotCreator;
