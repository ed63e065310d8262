//! Error types for the janitor jobs
//!
//! Startup problems (configuration) are the only errors that abort a job.
//! Everything else is counted per resource and reported in the job's statistics.

use std::fmt;

/// Main error type for the janitor
#[derive(Debug)]
pub enum JanitorError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Control-plane communication errors
    Inventory(InventoryError),

    /// Cleanup engine errors
    Cleanup(CleanupError),

    /// Notification delivery errors
    Notify(NotifyError),

    /// Other errors with context
    Other(String),
}

/// Configuration error variants
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Control-plane error variants
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryError {
    /// Caller is not allowed to perform the call
    AccessDenied { operation: String, message: String },

    /// Resource does not exist
    NotFound { resource_id: String },

    /// Resource is in use by another resource
    InUse { resource_id: String, message: String },

    /// Control plane asked us to slow down
    Throttled { operation: String },

    /// Any other non-success response
    Api {
        operation: String,
        status: u16,
        message: String,
    },

    /// Request never got a response
    Transport { operation: String, reason: String },

    /// Response body could not be decoded
    Decode { operation: String, reason: String },

    /// Server handed back the continuation token it was just given
    RepeatedToken { operation: String, token: String },
}

/// Notification delivery error variants
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyError {
    /// Webhook could not be reached
    DeliveryFailed { url: String, reason: String },

    /// Webhook answered with a non-success status
    Rejected { url: String, status: u16 },

    /// Webhook did not answer in time
    Timeout { url: String },
}

/// Cleanup engine error variants
#[derive(Debug, Clone, PartialEq)]
pub enum CleanupError {
    /// Delete action failed for a snapshot
    DeleteFailed { snapshot_id: String, message: String },

    /// Snapshot record could not be interpreted
    MalformedRecord {
        snapshot_id: Option<String>,
        reason: String,
    },
}

impl fmt::Display for JanitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JanitorError::Config(e) => write!(f, "Configuration error: {}", e),
            JanitorError::Inventory(e) => write!(f, "Inventory error: {}", e),
            JanitorError::Cleanup(e) => write!(f, "Cleanup error: {}", e),
            JanitorError::Notify(e) => write!(f, "Notification error: {}", e),
            JanitorError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::AccessDenied { operation, message } => {
                write!(f, "Access denied for {}: {}", operation, message)
            }
            InventoryError::NotFound { resource_id } => {
                write!(f, "Resource '{}' does not exist", resource_id)
            }
            InventoryError::InUse {
                resource_id,
                message,
            } => {
                write!(f, "Resource '{}' is in use: {}", resource_id, message)
            }
            InventoryError::Throttled { operation } => {
                write!(f, "Throttled while calling {}", operation)
            }
            InventoryError::Api {
                operation,
                status,
                message,
            } => {
                write!(f, "{} failed with status {}: {}", operation, status, message)
            }
            InventoryError::Transport { operation, reason } => {
                write!(f, "Request for {} failed: {}", operation, reason)
            }
            InventoryError::Decode { operation, reason } => {
                write!(f, "Failed to decode {} response: {}", operation, reason)
            }
            InventoryError::RepeatedToken { operation, token } => {
                write!(f, "{} returned the same next_token {:?} twice", operation, token)
            }
        }
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::DeliveryFailed { url, reason } => {
                write!(f, "Failed to deliver notification to {}: {}", url, reason)
            }
            NotifyError::Rejected { url, status } => {
                write!(f, "Notification webhook {} returned status {}", url, status)
            }
            NotifyError::Timeout { url } => {
                write!(f, "Notification webhook {} timed out", url)
            }
        }
    }
}

impl fmt::Display for CleanupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupError::DeleteFailed {
                snapshot_id,
                message,
            } => {
                write!(f, "Failed to delete snapshot {}: {}", snapshot_id, message)
            }
            CleanupError::MalformedRecord {
                snapshot_id,
                reason,
            } => match snapshot_id {
                Some(id) => write!(f, "Malformed snapshot record {}: {}", id, reason),
                None => write!(f, "Malformed snapshot record: {}", reason),
            },
        }
    }
}

impl std::error::Error for JanitorError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for InventoryError {}
impl std::error::Error for CleanupError {}
impl std::error::Error for NotifyError {}

impl From<anyhow::Error> for JanitorError {
    fn from(err: anyhow::Error) -> Self {
        JanitorError::Other(err.to_string())
    }
}

impl From<ConfigError> for JanitorError {
    fn from(err: ConfigError) -> Self {
        JanitorError::Config(err)
    }
}

impl From<InventoryError> for JanitorError {
    fn from(err: InventoryError) -> Self {
        JanitorError::Inventory(err)
    }
}

impl From<CleanupError> for JanitorError {
    fn from(err: CleanupError) -> Self {
        JanitorError::Cleanup(err)
    }
}

impl From<NotifyError> for JanitorError {
    fn from(err: NotifyError) -> Self {
        JanitorError::Notify(err)
    }
}
