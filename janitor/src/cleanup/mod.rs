//! Stale snapshot cleanup
//!
//! Lists every snapshot owned by the account, decides for each one whether it
//! may be deleted, and deletes it (or only logs the intent in dry-run mode).
//!
//! # Eligibility
//!
//! Checks run in this order; the first failing one is the skip reason:
//!
//! 1. State must be `completed`
//! 2. A start time must be present
//! 3. The start time must be strictly older than the cutoff
//! 4. The exclusion tag must not be present
//! 5. No image may reference the snapshot (lookup errors count as referenced)

pub mod eligibility;
pub mod engine;
pub mod stats;

use std::sync::Arc;

use crate::config::{CleanupSettings, RunOverride};
use crate::inventory::{IdentityResolver, SnapshotInventory};

pub use eligibility::{check_record, CleanupPolicy, ExclusionRule, SkipReason, Verdict};
pub use engine::{build_cutoff, CleanupEngine, Deleted};
pub use stats::{FailureRecord, RunStatistics};

/// Entry point for one cleanup invocation
pub async fn handle(
    settings: &CleanupSettings,
    run_override: &RunOverride,
    inventory: Arc<dyn SnapshotInventory>,
    identity: &dyn IdentityResolver,
) -> RunStatistics {
    let effective = settings.merge_override(run_override);
    let policy = CleanupPolicy::from(&effective);

    let engine = CleanupEngine::for_invocation(inventory, identity).await;
    engine.run(&policy).await
}
