//! Mock control-plane HTTP API for testing the HTTP inventory client

use janitor::config::InventorySettings;
use janitor::inventory::HttpInventoryClient;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockControlPlane {
    pub server: MockServer,
    pub base_url: String,
}

impl MockControlPlane {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn client(&self) -> HttpInventoryClient {
        self.client_with_key(None)
    }

    pub fn client_with_key(&self, api_key: Option<&str>) -> HttpInventoryClient {
        HttpInventoryClient::new(&InventorySettings {
            base_url: format!("{}/", self.base_url),
            api_key: api_key.map(str::to_string),
        })
        .expect("client should build")
    }

    pub async fn mock_identity(&self, account_id: &str) {
        Mock::given(method("GET"))
            .and(path("/identity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "account_id": account_id
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_identity_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/identity"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "message": "identity unavailable"
            })))
            .mount(&self.server)
            .await;
    }

    /// Serve `pages` in order; page N is requested with `next_token=page-N`
    pub async fn mock_snapshot_pages(&self, owner: &str, pages: Vec<Vec<Value>>) {
        let count = pages.len();
        for (index, snapshots) in pages.into_iter().enumerate() {
            let next_token = (index + 1 < count).then(|| format!("page-{}", index + 1));
            let body = json!({ "snapshots": snapshots, "next_token": next_token });

            let mock = Mock::given(method("GET"))
                .and(path("/snapshots"))
                .and(query_param("owner", owner));
            let mock = if index == 0 {
                mock.and(query_param_is_missing("next_token"))
            } else {
                mock.and(query_param("next_token", format!("page-{}", index)))
            };

            mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(1)
                .mount(&self.server)
                .await;
        }
    }

    pub async fn mock_snapshot_listing_failure(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/snapshots"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "message": "listing failed"
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_images(&self, snapshot_id: &str, image_ids: &[&str]) {
        let images: Vec<Value> = image_ids
            .iter()
            .map(|id| json!({ "image_id": id }))
            .collect();

        Mock::given(method("GET"))
            .and(path("/images"))
            .and(query_param("snapshot_id", snapshot_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "images": images })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_images_failure(&self, snapshot_id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path("/images"))
            .and(query_param("snapshot_id", snapshot_id))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "message": "not authorized to describe images"
            })))
            .mount(&self.server)
            .await;
    }

    /// Expect exactly `times` delete calls for the snapshot
    pub async fn mock_delete(&self, snapshot_id: &str, status: u16, times: u64) {
        Mock::given(method("DELETE"))
            .and(path(format!("/snapshots/{}", snapshot_id)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "message": format!("delete answered {}", status)
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Any delete is a test failure
    pub async fn forbid_deletes(&self) {
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_create_snapshot(&self, volume_id: &str, description: &str, snapshot_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/volumes/{}/snapshots", volume_id)))
            .and(body_json(json!({ "description": description })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "snapshot_id": snapshot_id
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_db_instances(&self, instances: Value) {
        Mock::given(method("GET"))
            .and(path("/db-instances"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "db_instances": instances })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_db_tags(&self, arn: &str, tags: Value) {
        Mock::given(method("GET"))
            .and(path("/db-instances/tags"))
            .and(query_param("arn", arn))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tags": tags })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_power_action(&self, identifier: &str, action: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/db-instances/{}/{}", identifier, action)))
            .respond_with(ResponseTemplate::new(200))
            .expect(times)
            .mount(&self.server)
            .await;
    }
}
