use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ScheduleSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    /// Inclusive
    pub start_hour: u32,
    /// Exclusive
    pub end_hour: u32,
}

impl BusinessHours {
    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

impl From<&ScheduleSettings> for BusinessHours {
    fn from(settings: &ScheduleSettings) -> Self {
        Self {
            start_hour: settings.business_hours_start,
            end_hour: settings.business_hours_end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    OffHours,
    Weekend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerAction {
    Start,
    Stop(StopReason),
}

impl PowerAction {
    /// Whether an instance reporting `status` already satisfies this action
    pub fn satisfied_by(&self, status: &str) -> bool {
        let status = status.to_ascii_lowercase();
        match self {
            PowerAction::Start => matches!(status.as_str(), "available" | "starting"),
            PowerAction::Stop(_) => matches!(status.as_str(), "stopped" | "stopping"),
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerAction::Start => write!(f, "start"),
            PowerAction::Stop(StopReason::OffHours) => write!(f, "stop (outside business hours)"),
            PowerAction::Stop(StopReason::Weekend) => write!(f, "stop (weekend)"),
        }
    }
}

pub fn desired_action<T: TimeZone>(local_now: &DateTime<T>, hours: &BusinessHours) -> PowerAction {
    match local_now.weekday() {
        Weekday::Sat | Weekday::Sun => PowerAction::Stop(StopReason::Weekend),
        _ if hours.contains(local_now.hour()) => PowerAction::Start,
        _ => PowerAction::Stop(StopReason::OffHours),
    }
}
