// File: janitor/src/config/mod.rs
pub mod manager;
pub mod overrides;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{cleanup, inventory, schedule};
use crate::errors::ConfigError;

pub use manager::ConfigManager;
pub use overrides::RunOverride;

/// Fully resolved settings for every job
#[derive(Debug, Clone)]
pub struct Settings {
    pub cleanup: CleanupSettings,
    pub inventory: InventorySettings,
    pub alerts: AlertSettings,
    pub database_schedule: ScheduleSettings,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanupSettings {
    pub retention_days: u32,
    pub dry_run: bool,
    pub exclude_tag_key: String,
    pub exclude_tag_value: String,
    /// Fields set explicitly through the environment; these beat invocation overrides
    pub pinned: EnvPins,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvPins {
    pub retention_days: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct InventorySettings {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AlertSettings {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub tag_key: String,
    pub tag_value: String,
    pub timezone: Tz,
    pub business_hours_start: u32,
    pub business_hours_end: u32,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            retention_days: cleanup::DEFAULT_RETENTION_DAYS,
            dry_run: cleanup::DEFAULT_DRY_RUN,
            exclude_tag_key: cleanup::DEFAULT_EXCLUDE_TAG_KEY.to_string(),
            exclude_tag_value: cleanup::DEFAULT_EXCLUDE_TAG_VALUE.to_string(),
            pinned: EnvPins::default(),
        }
    }
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            base_url: inventory::DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            tag_key: schedule::DEFAULT_TAG_KEY.to_string(),
            tag_value: schedule::DEFAULT_TAG_VALUE.to_string(),
            timezone: Tz::UTC,
            business_hours_start: schedule::BUSINESS_HOURS_START,
            business_hours_end: schedule::BUSINESS_HOURS_END,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cleanup: CleanupSettings::default(),
            inventory: InventorySettings::default(),
            alerts: AlertSettings::default(),
            database_schedule: ScheduleSettings::default(),
            log_level: LogLevel::Info,
        }
    }
}

/// Log verbosity; affects diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidValue {
                field: "LOG_LEVEL".to_string(),
                reason: format!("unknown level {:?}", value),
            }),
        }
    }

    /// Directive value understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Optional TOML configuration file; every field falls back to the defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub log_level: Option<String>,
    #[serde(default)]
    pub cleanup: CleanupFileSection,
    #[serde(default)]
    pub inventory: InventoryFileSection,
    #[serde(default)]
    pub alerts: AlertsFileSection,
    #[serde(default)]
    pub database_schedule: ScheduleFileSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupFileSection {
    pub retention_days: Option<u32>,
    pub dry_run: Option<bool>,
    pub exclude_tag_key: Option<String>,
    pub exclude_tag_value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryFileSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsFileSection {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleFileSection {
    pub tag_key: Option<String>,
    pub tag_value: Option<String>,
    pub timezone: Option<String>,
    pub business_hours_start: Option<u32>,
    pub business_hours_end: Option<u32>,
}

/// Boolean spelling shared by the environment and invocation overrides
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
