//! Control-plane collaborators
//!
//! The janitor never talks to a provider SDK directly. Everything it needs from
//! the cloud account goes through the traits below:
//!
//! - [`IdentityResolver`]: which account are we acting as
//! - [`SnapshotInventory`]: list, cross-reference, delete and create snapshots
//! - [`DatabaseFleet`]: list, tag lookup, start and stop managed databases
//!
//! [`HttpInventoryClient`] implements all three against the JSON control-plane API.

pub mod http;
pub mod pager;
pub mod types;

use async_trait::async_trait;

use crate::errors::InventoryError;

pub use http::HttpInventoryClient;
pub use pager::owned_snapshots;
pub use types::{
    normalize_timestamp, DbInstance, ListedSnapshot, MalformedRecord, OwnerScope, SnapshotPage,
    SnapshotRecord, SnapshotState, TagEntry, Tags,
};

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Account id the current credentials belong to
    async fn caller_account(&self) -> Result<String, InventoryError>;
}

#[async_trait]
pub trait SnapshotInventory: Send + Sync {
    /// Fetch one page of snapshots owned by `owner`, continuing from `next_token`
    async fn list_snapshots_page(
        &self,
        owner: &OwnerScope,
        next_token: Option<&str>,
    ) -> Result<SnapshotPage, InventoryError>;

    /// Ids of images that reference the snapshot
    async fn find_dependents(
        &self,
        owner: &OwnerScope,
        snapshot_id: &str,
    ) -> Result<Vec<String>, InventoryError>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), InventoryError>;

    /// Returns the id of the new snapshot
    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<String, InventoryError>;
}

#[async_trait]
pub trait DatabaseFleet: Send + Sync {
    async fn list_db_instances(&self) -> Result<Vec<DbInstance>, InventoryError>;

    async fn list_db_tags(&self, instance_arn: &str) -> Result<Tags, InventoryError>;

    async fn start_db_instance(&self, identifier: &str) -> Result<(), InventoryError>;

    async fn stop_db_instance(&self, identifier: &str) -> Result<(), InventoryError>;
}

/// Resolve the owner scope once per invocation, degrading to the caller's own scope
pub async fn resolve_owner(identity: &dyn IdentityResolver) -> OwnerScope {
    match identity.caller_account().await {
        Ok(account_id) if !account_id.is_empty() => OwnerScope::Account(account_id),
        Ok(_) => {
            tracing::warn!("Identity service returned an empty account id, using caller scope");
            OwnerScope::Caller
        }
        Err(e) => {
            tracing::warn!("Failed to determine account id: {}", e);
            OwnerScope::Caller
        }
    }
}
