// File: janitor/src/cleanup/engine.rs
use chrono::{DateTime, Duration, Utc};
use futures::{pin_mut, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::eligibility::{check_record, CleanupPolicy, ExclusionRule, SkipReason, Verdict};
use super::stats::RunStatistics;
use crate::errors::CleanupError;
use crate::inventory::{
    owned_snapshots, resolve_owner, IdentityResolver, ListedSnapshot, OwnerScope,
    SnapshotInventory, SnapshotRecord,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
    pub snapshot_id: String,
}

/// Cutoff for a retention window; snapshots strictly older than this are candidates.
///
/// Saturates at the earliest representable instant, so an oversized window
/// keeps every snapshot.
pub fn build_cutoff(now: DateTime<Utc>, retention_days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(retention_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Stale snapshot cleanup for one owner scope.
///
/// Built once per invocation; the owner scope is resolved up front and reused
/// for every listing and cross-reference call of that invocation.
pub struct CleanupEngine {
    inventory: Arc<dyn SnapshotInventory>,
    owner: OwnerScope,
}

impl CleanupEngine {
    pub fn new(inventory: Arc<dyn SnapshotInventory>, owner: OwnerScope) -> Self {
        Self { inventory, owner }
    }

    pub async fn for_invocation(
        inventory: Arc<dyn SnapshotInventory>,
        identity: &dyn IdentityResolver,
    ) -> Self {
        let owner = resolve_owner(identity).await;
        Self::new(inventory, owner)
    }

    pub fn owner(&self) -> &OwnerScope {
        &self.owner
    }

    /// Decide whether a snapshot should be deleted.
    ///
    /// Checks run in a fixed order and the first failure supplies the reason. The
    /// cross-reference lookup fails closed: if it errors, the snapshot is treated
    /// as referenced.
    pub async fn evaluate(
        &self,
        record: &SnapshotRecord,
        cutoff: DateTime<Utc>,
        rule: &ExclusionRule,
    ) -> Result<Verdict, CleanupError> {
        if let Some(reason) = check_record(record, cutoff, rule)? {
            return Ok(Verdict::Skip(reason));
        }

        match self
            .inventory
            .find_dependents(&self.owner, &record.snapshot_id)
            .await
        {
            Ok(images) if images.is_empty() => Ok(Verdict::Eligible),
            Ok(images) => {
                debug!(
                    "Snapshot {} is referenced by image(s): {:?}",
                    record.snapshot_id, images
                );
                Ok(Verdict::Skip(SkipReason::Referenced))
            }
            Err(e) => {
                warn!(
                    "Failed to look up images for snapshot {}, treating as in use: {}",
                    record.snapshot_id, e
                );
                Ok(Verdict::Skip(SkipReason::ReferenceUnknown))
            }
        }
    }

    pub async fn delete(&self, snapshot_id: &str) -> Result<Deleted, CleanupError> {
        match self.inventory.delete_snapshot(snapshot_id).await {
            Ok(()) => Ok(Deleted {
                snapshot_id: snapshot_id.to_string(),
            }),
            Err(e) => Err(CleanupError::DeleteFailed {
                snapshot_id: snapshot_id.to_string(),
                message: e.to_string(),
            }),
        }
    }

    pub async fn run(&self, policy: &CleanupPolicy) -> RunStatistics {
        let cutoff = build_cutoff(Utc::now(), policy.retention_days);
        self.run_with_cutoff(policy, cutoff).await
    }

    /// Single pass over every owned snapshot; never aborts on a per-snapshot failure
    pub async fn run_with_cutoff(
        &self,
        policy: &CleanupPolicy,
        cutoff: DateTime<Utc>,
    ) -> RunStatistics {
        let run_id = Uuid::new_v4();
        let span = info_span!("cleanup_run", run_id = %run_id);

        async move {
            info!(
                "Starting stale snapshot cleanup: retention_days={}, dry_run={}, exclude_tag={}, owner={}",
                policy.retention_days, policy.dry_run, policy.exclusion, self.owner
            );
            info!("Deleting snapshots older than {} (UTC)", cutoff.to_rfc3339());

            let mut stats = RunStatistics::new(run_id, policy.dry_run, cutoff);

            let listing = owned_snapshots(self.inventory.as_ref(), &self.owner);
            pin_mut!(listing);

            while let Some(item) = listing.next().await {
                match item {
                    Ok(ListedSnapshot::Record(record)) => {
                        stats.record_scanned();
                        self.process(&record, policy, cutoff, &mut stats).await;
                    }
                    Ok(ListedSnapshot::Malformed(malformed)) => {
                        stats.record_scanned();
                        let err = CleanupError::MalformedRecord {
                            snapshot_id: malformed.snapshot_id.clone(),
                            reason: malformed.reason,
                        };
                        error!("Unhandled error processing snapshot: {}", err);
                        stats.record_error(malformed.snapshot_id.as_deref(), err.to_string());
                    }
                    Err(e) => {
                        error!("Snapshot listing stopped early: {}", e);
                        stats.record_error(None, e.to_string());
                    }
                }
            }

            info!(
                "Completed. Scanned={} Eligible={} Deleted={} Skipped={} Errors={}",
                stats.total_scanned, stats.eligible, stats.deleted, stats.skipped, stats.errors
            );
            debug!("Skipped reasons: {:?}", stats.skipped_reasons);

            stats
        }
        .instrument(span)
        .await
    }

    async fn process(
        &self,
        record: &SnapshotRecord,
        policy: &CleanupPolicy,
        cutoff: DateTime<Utc>,
        stats: &mut RunStatistics,
    ) {
        let snapshot_id = record.snapshot_id.as_str();

        let verdict = match self.evaluate(record, cutoff, &policy.exclusion).await {
            Ok(verdict) => verdict,
            Err(e) => {
                error!("Unhandled error processing snapshot {}: {}", snapshot_id, e);
                stats.record_error(Some(snapshot_id), e.to_string());
                return;
            }
        };

        if let Verdict::Skip(reason) = &verdict {
            debug!("Skip {}: {}", snapshot_id, reason);
            stats.record_skip(reason);
            return;
        }

        stats.record_eligible();
        info!(
            "Eligible snapshot {} size={}GB start_time={} desc={:?}",
            snapshot_id,
            record
                .volume_size_gib
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string()),
            record.start_time.as_deref().unwrap_or_default(),
            record.description
        );

        if policy.dry_run {
            info!("[DRY_RUN] Would delete snapshot {}", snapshot_id);
            return;
        }

        match self.delete(snapshot_id).await {
            Ok(deleted) => {
                stats.record_deleted();
                info!("Deleted snapshot {}", deleted.snapshot_id);
            }
            Err(e) => {
                warn!("{}", e);
                stats.record_error(Some(snapshot_id), e.to_string());
            }
        }
    }
}
