//! On-demand snapshot creation
//!
//! Snapshots a list of volumes and reports each result to the notification
//! sink. A failure on one volume does not stop the remaining volumes.

pub mod creator;

pub use creator::{snapshot_description, CreatedSnapshot, SnapshotCreator, SnapshotReport, VolumeFailure};
