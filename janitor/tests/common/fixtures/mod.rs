//! This module provides reusable test utilities:
//! - In-memory control plane (snapshots, images, databases)
//! - Mock HTTP control plane and webhook servers
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_control_plane;
pub mod mock_inventory;
pub mod mock_webhook;
pub mod test_data;

// Re-export commonly used items
pub use mock_control_plane::MockControlPlane;
pub use mock_inventory::{InMemoryFleet, InMemoryInventory};
pub use mock_webhook::{MockWebhookServer, RecordingSink};
pub use test_data::*;
