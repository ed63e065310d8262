// File: janitor/src/config/manager.rs
use super::{
    parse_bool, AlertSettings, CleanupSettings, EnvPins, FileConfig, InventorySettings, LogLevel,
    ScheduleSettings, Settings,
};
use crate::constants::cleanup::MAX_RETENTION_DAYS;
use crate::errors::ConfigError;
use chrono_tz::Tz;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Environment variable names recognised by the janitor
pub mod env_keys {
    pub const RETENTION_DAYS: &str = "RETENTION_DAYS";
    pub const DRY_RUN: &str = "DRY_RUN";
    pub const EXCLUDE_TAG_KEY: &str = "EXCLUDE_TAG_KEY";
    pub const EXCLUDE_TAG_VALUE: &str = "EXCLUDE_TAG_VALUE";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const API_URL: &str = "JANITOR_API_URL";
    pub const API_KEY: &str = "JANITOR_API_KEY";
    pub const ALERT_WEBHOOK_URL: &str = "ALERT_WEBHOOK_URL";
    pub const TAG_KEY: &str = "TAG_KEY";
    pub const TAG_VALUE: &str = "TAG_VALUE";
    pub const TIMEZONE: &str = "TIMEZONE";
}

pub struct ConfigManager {
    current_settings: Arc<Settings>,
}

impl ConfigManager {
    /// Load settings from an optional TOML file and the process environment
    pub async fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file_config = match config_path {
            Some(path) => Self::read_file(path).await?,
            None => FileConfig::default(),
        };

        let settings = Self::resolve(file_config, |key| std::env::var(key).ok())?;
        Ok(Self {
            current_settings: Arc::new(settings),
        })
    }

    pub fn get_current_settings(&self) -> Arc<Settings> {
        self.current_settings.clone()
    }

    /// Log the effective settings; call once logging is initialised
    pub fn log_summary(&self) {
        let settings = &self.current_settings;
        info!(
            "Configuration loaded: retention_days={}, dry_run={}, exclude_tag={}={}, api={}",
            settings.cleanup.retention_days,
            settings.cleanup.dry_run,
            settings.cleanup.exclude_tag_key,
            settings.cleanup.exclude_tag_value,
            settings.inventory.base_url
        );
    }

    async fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        debug!("Loading config file: {}", path.display());

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Self::parse_file(&content)
    }

    pub fn parse_file(content: &str) -> Result<FileConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })
    }

    /// Layer environment values over the file values over the defaults.
    ///
    /// `env` returns the raw value of a variable. Empty values count as unset,
    /// except for `EXCLUDE_TAG_VALUE` where an empty value means "key only".
    pub fn resolve<F>(file: FileConfig, env: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        let mut cleanup = CleanupSettings {
            retention_days: file
                .cleanup
                .retention_days
                .unwrap_or(defaults.cleanup.retention_days),
            dry_run: file.cleanup.dry_run.unwrap_or(defaults.cleanup.dry_run),
            exclude_tag_key: file
                .cleanup
                .exclude_tag_key
                .unwrap_or(defaults.cleanup.exclude_tag_key),
            exclude_tag_value: file
                .cleanup
                .exclude_tag_value
                .unwrap_or(defaults.cleanup.exclude_tag_value),
            pinned: EnvPins::default(),
        };
        check_retention_days("cleanup.retention_days", cleanup.retention_days)?;

        if let Some(raw) = lookup(env_keys::RETENTION_DAYS) {
            cleanup.retention_days = parse_retention_days(&raw)?;
            cleanup.pinned.retention_days = true;
        }

        if let Some(raw) = lookup(env_keys::DRY_RUN) {
            cleanup.dry_run = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                field: env_keys::DRY_RUN.to_string(),
                reason: format!("expected a boolean, got {:?}", raw),
            })?;
            cleanup.pinned.dry_run = true;
        }

        if let Some(key) = lookup(env_keys::EXCLUDE_TAG_KEY) {
            cleanup.exclude_tag_key = key;
        }

        if let Some(value) = env(env_keys::EXCLUDE_TAG_VALUE) {
            cleanup.exclude_tag_value = value;
        }

        let inventory = InventorySettings {
            base_url: lookup(env_keys::API_URL)
                .or(file.inventory.base_url)
                .unwrap_or(defaults.inventory.base_url),
            api_key: lookup(env_keys::API_KEY).or(file.inventory.api_key),
        };

        let alerts = AlertSettings {
            webhook_url: lookup(env_keys::ALERT_WEBHOOK_URL)
                .or(file.alerts.webhook_url)
                .filter(|url| !url.is_empty()),
        };

        let timezone_name = lookup(env_keys::TIMEZONE).or(file.database_schedule.timezone);
        let timezone = match timezone_name {
            Some(name) => parse_timezone(&name)?,
            None => defaults.database_schedule.timezone,
        };

        let database_schedule = ScheduleSettings {
            tag_key: lookup(env_keys::TAG_KEY)
                .or(file.database_schedule.tag_key)
                .unwrap_or(defaults.database_schedule.tag_key),
            tag_value: lookup(env_keys::TAG_VALUE)
                .or(file.database_schedule.tag_value)
                .unwrap_or(defaults.database_schedule.tag_value),
            timezone,
            business_hours_start: file
                .database_schedule
                .business_hours_start
                .unwrap_or(defaults.database_schedule.business_hours_start),
            business_hours_end: file
                .database_schedule
                .business_hours_end
                .unwrap_or(defaults.database_schedule.business_hours_end),
        };
        validate_business_hours(&database_schedule)?;

        let log_level = match lookup(env_keys::LOG_LEVEL).or(file.log_level) {
            Some(level) => LogLevel::parse(&level)?,
            None => defaults.log_level,
        };

        Ok(Settings {
            cleanup,
            inventory,
            alerts,
            database_schedule,
            log_level,
        })
    }
}

fn parse_retention_days(raw: &str) -> Result<u32, ConfigError> {
    let days = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue {
            field: env_keys::RETENTION_DAYS.to_string(),
            reason: format!("must be a non-negative integer, got {:?}", raw),
        })?;
    check_retention_days(env_keys::RETENTION_DAYS, days)
}

fn check_retention_days(field: &str, days: u32) -> Result<u32, ConfigError> {
    if days > MAX_RETENTION_DAYS {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be at most {}, got {}", MAX_RETENTION_DAYS, days),
        });
    }
    Ok(days)
}

fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| ConfigError::InvalidValue {
            field: env_keys::TIMEZONE.to_string(),
            reason: format!("unknown timezone {:?}: {}", name, e),
        })
}

fn validate_business_hours(schedule: &ScheduleSettings) -> Result<(), ConfigError> {
    let start = schedule.business_hours_start;
    let end = schedule.business_hours_end;
    if start >= end || end > 24 {
        return Err(ConfigError::InvalidValue {
            field: "database_schedule.business_hours".to_string(),
            reason: format!("expected start < end <= 24, got {}..{}", start, end),
        });
    }
    Ok(())
}
