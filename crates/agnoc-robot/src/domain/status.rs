use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::DomainError;

/// Coarse activity of the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    Error,
    Docked,
    Idle,
    Returning,
    Cleaning,
    Paused,
    ManualControl,
    Moving,
    Unknown,
}

impl DeviceState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Docked => "docked",
            Self::Idle => "idle",
            Self::Returning => "returning",
            Self::Cleaning => "cleaning",
            Self::Paused => "paused",
            Self::ManualControl => "manual_control",
            Self::Moving => "moving",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cleaning mode, independent of [`DeviceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceMode {
    None,
    Spot,
    Zone,
    Mop,
    Unknown,
}

impl DeviceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Spot => "spot",
            Self::Zone => "zone",
            Self::Mop => "mop",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! level_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            Off,
            Low,
            Medium,
            High,
        }

        impl $name {
            pub const ALL: [$name; 4] = [Self::Off, Self::Low, Self::Medium, Self::High];

            /// Raw wire code, 0..=3.
            pub fn code(self) -> u32 {
                match self {
                    Self::Off => 0,
                    Self::Low => 1,
                    Self::Medium => 2,
                    Self::High => 3,
                }
            }

            pub fn from_code(code: u32) -> Result<Self, DomainError> {
                Self::ALL
                    .into_iter()
                    .find(|level| level.code() == code)
                    .ok_or(DomainError::UnrecognizedCode { kind: $kind, code })
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    Self::Off => "off",
                    Self::Low => "low",
                    Self::Medium => "medium",
                    Self::High => "high",
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|level| level.as_str() == s)
                    .ok_or_else(|| DomainError::InvalidArgument(format!("invalid {}: {s}", $kind)))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

level_enum!(
    /// Suction power.
    FanSpeed,
    "fan speed"
);
level_enum!(
    /// Mop water flow.
    WaterLevel,
    "water level"
);

/// Battery charge in percent, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Battery(u8);

impl Battery {
    pub fn new(percent: u32) -> Result<Self, DomainError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .map(Self)
            .ok_or_else(|| DomainError::InvalidArgument(format!("battery {percent}% out of range")))
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

/// Last known status. Every field is optional so partial pushes can be
/// merged without clobbering what an earlier push reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub battery: Option<Battery>,
    pub state: Option<DeviceState>,
    pub mode: Option<DeviceMode>,
    pub fan_speed: Option<FanSpeed>,
    pub water_level: Option<WaterLevel>,
    /// Square meters cleaned in the current run.
    pub clean_size: Option<u32>,
    /// Seconds spent in the current run.
    pub clean_time: Option<u32>,
}

impl DeviceStatus {
    /// Overwrite with every field `update` carries.
    pub fn merge(&mut self, update: DeviceStatus) {
        self.battery = update.battery.or(self.battery);
        self.state = update.state.or(self.state);
        self.mode = update.mode.or(self.mode);
        self.fan_speed = update.fan_speed.or(self.fan_speed);
        self.water_level = update.water_level.or(self.water_level);
        self.clean_size = update.clean_size.or(self.clean_size);
        self.clean_time = update.clean_time.or(self.clean_time);
    }
}
