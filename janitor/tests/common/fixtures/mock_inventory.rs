//! In-memory control plane for engine-level tests
//!
//! Serves snapshots in fixed-size pages, answers image cross-reference lookups,
//! records every delete and create call, and lets a test inject failures per
//! snapshot or per page.

use async_trait::async_trait;
use janitor::errors::InventoryError;
use janitor::inventory::{
    DatabaseFleet, DbInstance, IdentityResolver, ListedSnapshot, MalformedRecord, OwnerScope,
    SnapshotInventory, SnapshotPage, SnapshotRecord, Tags,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub struct InMemoryInventory {
    account: Result<String, InventoryError>,
    entries: Vec<ListedSnapshot>,
    page_size: usize,
    failing_page: Option<usize>,
    dependents: HashMap<String, Vec<String>>,
    dependent_failures: HashMap<String, InventoryError>,
    delete_failures: HashMap<String, InventoryError>,
    create_failures: HashSet<String>,
    calls: Mutex<Calls>,
}

#[derive(Debug, Default, Clone)]
pub struct Calls {
    /// Token passed to each page request, in order
    pub page_tokens: Vec<Option<String>>,
    /// Owner scope used by listing and cross-reference calls
    pub owners: Vec<OwnerScope>,
    pub dependent_lookups: Vec<String>,
    pub deletes: Vec<String>,
    pub creates: Vec<(String, String)>,
}

impl InMemoryInventory {
    pub fn new(records: Vec<SnapshotRecord>) -> Self {
        Self {
            account: Ok(super::TEST_ACCOUNT.to_string()),
            entries: records.into_iter().map(ListedSnapshot::Record).collect(),
            page_size: 100,
            failing_page: None,
            dependents: HashMap::new(),
            dependent_failures: HashMap::new(),
            delete_failures: HashMap::new(),
            create_failures: HashSet::new(),
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_identity_failure(mut self, error: InventoryError) -> Self {
        self.account = Err(error);
        self
    }

    pub fn with_account(mut self, account_id: &str) -> Self {
        self.account = Ok(account_id.to_string());
        self
    }

    pub fn with_malformed(mut self, snapshot_id: Option<&str>, reason: &str) -> Self {
        self.entries.push(ListedSnapshot::Malformed(MalformedRecord {
            snapshot_id: snapshot_id.map(str::to_string),
            reason: reason.to_string(),
        }));
        self
    }

    /// Page `index` (zero-based) fails instead of returning entries
    pub fn with_failing_page(mut self, index: usize) -> Self {
        self.failing_page = Some(index);
        self
    }

    pub fn with_dependents(mut self, snapshot_id: &str, image_ids: &[&str]) -> Self {
        self.dependents.insert(
            snapshot_id.to_string(),
            image_ids.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_dependent_failure(mut self, snapshot_id: &str, error: InventoryError) -> Self {
        self.dependent_failures.insert(snapshot_id.to_string(), error);
        self
    }

    pub fn with_delete_failure(mut self, snapshot_id: &str, error: InventoryError) -> Self {
        self.delete_failures.insert(snapshot_id.to_string(), error);
        self
    }

    pub fn with_create_failure(mut self, volume_id: &str) -> Self {
        self.create_failures.insert(volume_id.to_string());
        self
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls().deletes
    }
}

fn page_index(token: Option<&str>) -> usize {
    token
        .and_then(|t| t.strip_prefix("page-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl IdentityResolver for InMemoryInventory {
    async fn caller_account(&self) -> Result<String, InventoryError> {
        self.account.clone()
    }
}

#[async_trait]
impl SnapshotInventory for InMemoryInventory {
    async fn list_snapshots_page(
        &self,
        owner: &OwnerScope,
        next_token: Option<&str>,
    ) -> Result<SnapshotPage, InventoryError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.page_tokens.push(next_token.map(str::to_string));
            calls.owners.push(owner.clone());
        }

        let index = page_index(next_token);
        if self.failing_page == Some(index) {
            return Err(InventoryError::Throttled {
                operation: "list snapshots".to_string(),
            });
        }

        let start = index * self.page_size;
        let end = (start + self.page_size).min(self.entries.len());
        let entries = self.entries.get(start..end).unwrap_or_default().to_vec();
        let next_token = (end < self.entries.len()).then(|| format!("page-{}", index + 1));

        Ok(SnapshotPage {
            entries,
            next_token,
        })
    }

    async fn find_dependents(
        &self,
        owner: &OwnerScope,
        snapshot_id: &str,
    ) -> Result<Vec<String>, InventoryError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.dependent_lookups.push(snapshot_id.to_string());
            calls.owners.push(owner.clone());
        }

        if let Some(error) = self.dependent_failures.get(snapshot_id) {
            return Err(error.clone());
        }
        Ok(self.dependents.get(snapshot_id).cloned().unwrap_or_default())
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), InventoryError> {
        self.calls
            .lock()
            .unwrap()
            .deletes
            .push(snapshot_id.to_string());

        match self.delete_failures.get(snapshot_id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<String, InventoryError> {
        let mut calls = self.calls.lock().unwrap();
        calls
            .creates
            .push((volume_id.to_string(), description.to_string()));

        if self.create_failures.contains(volume_id) {
            return Err(InventoryError::NotFound {
                resource_id: volume_id.to_string(),
            });
        }
        Ok(format!("snap-for-{}", volume_id))
    }
}

/// In-memory managed database fleet
pub struct InMemoryFleet {
    instances: Vec<DbInstance>,
    tags: HashMap<String, Tags>,
    tag_failures: HashSet<String>,
    action_failures: HashSet<String>,
    listing_fails: bool,
    actions: Mutex<Vec<(String, &'static str)>>,
}

impl InMemoryFleet {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            tags: HashMap::new(),
            tag_failures: HashSet::new(),
            action_failures: HashSet::new(),
            listing_fails: false,
            actions: Mutex::new(Vec::new()),
        }
    }

    pub fn with_instance(mut self, instance: DbInstance, tags: &[(&str, &str)]) -> Self {
        self.tags
            .insert(instance.arn.clone(), tags.iter().copied().collect());
        self.instances.push(instance);
        self
    }

    pub fn with_tag_failure(mut self, identifier: &str) -> Self {
        self.tag_failures.insert(identifier.to_string());
        self
    }

    pub fn with_action_failure(mut self, identifier: &str) -> Self {
        self.action_failures.insert(identifier.to_string());
        self
    }

    pub fn with_listing_failure(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    /// `(identifier, "start" | "stop")` for every power call made
    pub fn actions(&self) -> Vec<(String, &'static str)> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, identifier: &str, action: &'static str) -> Result<(), InventoryError> {
        self.actions
            .lock()
            .unwrap()
            .push((identifier.to_string(), action));

        if self.action_failures.contains(identifier) {
            return Err(InventoryError::Api {
                operation: format!("{} db instance", action),
                status: 400,
                message: "InvalidDBInstanceState".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseFleet for InMemoryFleet {
    async fn list_db_instances(&self) -> Result<Vec<DbInstance>, InventoryError> {
        if self.listing_fails {
            return Err(InventoryError::AccessDenied {
                operation: "describe db instances".to_string(),
                message: "not authorized".to_string(),
            });
        }
        Ok(self.instances.clone())
    }

    async fn list_db_tags(&self, instance_arn: &str) -> Result<Tags, InventoryError> {
        let failing = self
            .instances
            .iter()
            .any(|i| i.arn == instance_arn && self.tag_failures.contains(&i.identifier));
        if failing {
            return Err(InventoryError::Throttled {
                operation: "list db tags".to_string(),
            });
        }
        Ok(self.tags.get(instance_arn).cloned().unwrap_or_default())
    }

    async fn start_db_instance(&self, identifier: &str) -> Result<(), InventoryError> {
        self.record(identifier, "start")
    }

    async fn stop_db_instance(&self, identifier: &str) -> Result<(), InventoryError> {
        self.record(identifier, "stop")
    }
}
