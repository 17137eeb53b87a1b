use std::fmt;

use serde::Serialize;

use crate::error::DomainError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Time of day with minute resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DeviceTime {
    hour: u8,
    minute: u8,
}

impl DeviceTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, DomainError> {
        if hour > 23 || minute > 59 {
            return Err(DomainError::InvalidArgument(format!(
                "invalid time {hour}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Minutes since midnight, as the device encodes times of day.
    pub fn from_minutes(minutes: u32) -> Result<Self, DomainError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(DomainError::InvalidArgument(format!(
                "{minutes} minutes is past the end of the day"
            )));
        }
        Ok(Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        })
    }

    pub fn to_minutes(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for DeviceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuietHours {
    pub is_enabled: bool,
    pub begin: DeviceTime,
    pub end: DeviceTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Voice {
    pub is_enabled: bool,
    pub volume: u32,
}

/// User-facing preferences pushed by the device agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceConfig {
    pub voice: Voice,
    pub quiet_hours: QuietHours,
    pub is_eco_mode_enabled: bool,
    pub is_repeat_clean_enabled: bool,
    pub is_broken_clean_enabled: bool,
    pub is_carpet_mode_enabled: bool,
    pub is_history_map_enabled: bool,
}

impl DeviceConfig {
    pub fn update_quiet_hours(&mut self, quiet_hours: QuietHours) {
        self.quiet_hours = quiet_hours;
    }

    pub fn update_carpet_mode(&mut self, enabled: bool) {
        self.is_carpet_mode_enabled = enabled;
    }
}
