// File: janitor/src/inventory/http.rs
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{
    DatabaseFleet, DbInstance, IdentityResolver, ListedSnapshot, MalformedRecord, OwnerScope,
    SnapshotInventory, SnapshotPage, SnapshotRecord, Tags,
};
use crate::config::InventorySettings;
use crate::constants::inventory::REQUEST_TIMEOUT;
use crate::errors::InventoryError;

#[derive(Debug, Deserialize)]
struct IdentityBody {
    account_id: String,
}

#[derive(Debug, Deserialize)]
struct SnapshotPageBody {
    #[serde(default)]
    snapshots: Vec<Value>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageRef {
    image_id: String,
}

#[derive(Debug, Deserialize)]
struct ImagesBody {
    #[serde(default)]
    images: Vec<ImageRef>,
}

#[derive(Debug, Deserialize)]
struct CreatedSnapshotBody {
    snapshot_id: String,
}

#[derive(Debug, Deserialize)]
struct DbInstancesBody {
    #[serde(default)]
    db_instances: Vec<DbInstance>,
}

#[derive(Debug, Deserialize)]
struct TagsBody {
    #[serde(default)]
    tags: Tags,
}

/// JSON control-plane client implementing every collaborator trait
pub struct HttpInventoryClient {
    base: Url,
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpInventoryClient {
    pub fn new(settings: &InventorySettings) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| InventoryError::Transport {
                operation: "client setup".to_string(),
                reason: e.to_string(),
            })?;

        let base_url = settings.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url).map_err(|e| InventoryError::Transport {
            operation: "client setup".to_string(),
            reason: format!("invalid base url {:?}: {}", base_url, e),
        })?;
        if base.cannot_be_a_base() {
            return Err(InventoryError::Transport {
                operation: "client setup".to_string(),
                reason: format!("base url {:?} cannot carry a path", base_url),
            });
        }

        Ok(Self {
            base,
            base_url,
            api_key: settings.api_key.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Append path segments to the base url; each segment is percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, InventoryError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| InventoryError::Transport {
                operation: "build request url".to_string(),
                reason: format!("base url {:?} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    /// Send a request and turn any non-success status into an [`InventoryError`]
    async fn send(
        &self,
        operation: &str,
        resource_id: &str,
        request: RequestBuilder,
    ) -> Result<Response, InventoryError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| InventoryError::Transport {
                operation: operation.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(operation, resource_id, status, &body))
    }

    async fn decode<T: DeserializeOwned>(
        operation: &str,
        response: Response,
    ) -> Result<T, InventoryError> {
        response
            .json::<T>()
            .await
            .map_err(|e| InventoryError::Decode {
                operation: operation.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Map a non-success response into the error taxonomy
fn map_status(operation: &str, resource_id: &str, status: StatusCode, body: &str) -> InventoryError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InventoryError::AccessDenied {
            operation: operation.to_string(),
            message,
        },
        StatusCode::NOT_FOUND => InventoryError::NotFound {
            resource_id: resource_id.to_string(),
        },
        StatusCode::CONFLICT => InventoryError::InUse {
            resource_id: resource_id.to_string(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => InventoryError::Throttled {
            operation: operation.to_string(),
        },
        other => InventoryError::Api {
            operation: operation.to_string(),
            status: other.as_u16(),
            message,
        },
    }
}

/// Prefer the `message` field of a JSON error body, fall back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn decode_listed(entry: Value) -> ListedSnapshot {
    let snapshot_id = entry
        .get("snapshot_id")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    match serde_json::from_value::<SnapshotRecord>(entry) {
        Ok(record) => ListedSnapshot::Record(record),
        Err(e) => ListedSnapshot::Malformed(MalformedRecord {
            snapshot_id,
            reason: e.to_string(),
        }),
    }
}

#[async_trait]
impl IdentityResolver for HttpInventoryClient {
    async fn caller_account(&self) -> Result<String, InventoryError> {
        let operation = "get caller identity";
        let response = self
            .send(operation, "identity", self.client.get(self.url(&["identity"])?))
            .await?;
        let body: IdentityBody = Self::decode(operation, response).await?;
        Ok(body.account_id)
    }
}

#[async_trait]
impl SnapshotInventory for HttpInventoryClient {
    async fn list_snapshots_page(
        &self,
        owner: &OwnerScope,
        next_token: Option<&str>,
    ) -> Result<SnapshotPage, InventoryError> {
        let operation = "list snapshots";
        let mut query = vec![("owner", owner.as_query_value())];
        if let Some(token) = next_token {
            query.push(("next_token", token));
        }

        debug!("Listing snapshots for owner {} (token: {:?})", owner, next_token);
        let request = self.client.get(self.url(&["snapshots"])?).query(&query);
        let response = self.send(operation, "snapshots", request).await?;
        let body: SnapshotPageBody = Self::decode(operation, response).await?;

        Ok(SnapshotPage {
            entries: body.snapshots.into_iter().map(decode_listed).collect(),
            next_token: body.next_token,
        })
    }

    async fn find_dependents(
        &self,
        owner: &OwnerScope,
        snapshot_id: &str,
    ) -> Result<Vec<String>, InventoryError> {
        let operation = "describe images";
        let request = self
            .client
            .get(self.url(&["images"])?)
            .query(&[("owner", owner.as_query_value()), ("snapshot_id", snapshot_id)]);
        let response = self.send(operation, snapshot_id, request).await?;
        let body: ImagesBody = Self::decode(operation, response).await?;

        Ok(body.images.into_iter().map(|i| i.image_id).collect())
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), InventoryError> {
        let request = self.client.delete(self.url(&["snapshots", snapshot_id])?);
        self.send("delete snapshot", snapshot_id, request).await?;
        Ok(())
    }

    async fn create_snapshot(
        &self,
        volume_id: &str,
        description: &str,
    ) -> Result<String, InventoryError> {
        let operation = "create snapshot";
        let request = self
            .client
            .post(self.url(&["volumes", volume_id, "snapshots"])?)
            .json(&json!({ "description": description }));
        let response = self.send(operation, volume_id, request).await?;
        let body: CreatedSnapshotBody = Self::decode(operation, response).await?;
        Ok(body.snapshot_id)
    }
}

#[async_trait]
impl DatabaseFleet for HttpInventoryClient {
    async fn list_db_instances(&self) -> Result<Vec<DbInstance>, InventoryError> {
        let operation = "describe db instances";
        let response = self
            .send(operation, "db-instances", self.client.get(self.url(&["db-instances"])?))
            .await?;
        let body: DbInstancesBody = Self::decode(operation, response).await?;
        Ok(body.db_instances)
    }

    async fn list_db_tags(&self, instance_arn: &str) -> Result<Tags, InventoryError> {
        let operation = "list db tags";
        let request = self
            .client
            .get(self.url(&["db-instances", "tags"])?)
            .query(&[("arn", instance_arn)]);
        let response = self.send(operation, instance_arn, request).await?;
        let body: TagsBody = Self::decode(operation, response).await?;
        Ok(body.tags)
    }

    async fn start_db_instance(&self, identifier: &str) -> Result<(), InventoryError> {
        let request = self
            .client
            .post(self.url(&["db-instances", identifier, "start"])?);
        self.send("start db instance", identifier, request).await?;
        Ok(())
    }

    async fn stop_db_instance(&self, identifier: &str) -> Result<(), InventoryError> {
        let request = self
            .client
            .post(self.url(&["db-instances", identifier, "stop"])?);
        self.send("stop db instance", identifier, request).await?;
        Ok(())
    }
}
