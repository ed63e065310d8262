//! Business-hours power schedule for managed databases
//!
//! Instances carrying the configured selector tag are started during business
//! hours on weekdays and stopped at all other times:
//!
//! - **Weekdays** (Monday to Friday): started from `business_hours_start` up to,
//!   but not including, `business_hours_end`; stopped otherwise
//! - **Weekends**: stopped all day
//!
//! The clock is evaluated in the configured timezone, so "06:00" means six in
//! the morning where the databases' users are, not six in the morning UTC.
//!
//! # Configuration
//!
//! ```toml
//! [database_schedule]
//! tag_key = "Environment"
//! tag_value = "Staging"
//! timezone = "Europe/Sofia"
//! business_hours_start = 7
//! business_hours_end = 19
//! ```

pub mod runner;
pub mod window;

pub use runner::{DatabaseScheduler, InstanceFailure, ScheduleReport};
pub use window::{desired_action, BusinessHours, PowerAction, StopReason};
