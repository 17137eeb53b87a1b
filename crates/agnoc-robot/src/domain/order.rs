use agnoc_protocol::payload::{OrderCleanInfo, OrderEntry};
use agnoc_protocol::Id;
use serde::Serialize;

use super::settings::DeviceTime;
use super::status::{FanSpeed, WaterLevel};
use crate::error::DomainError;

/// A scheduled cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceOrder {
    pub id: Id,
    pub map_id: Id,
    pub plan_id: u32,
    pub is_enabled: bool,
    pub is_repeat_enabled: bool,
    /// Bit 0 is Sunday.
    pub weekdays: u8,
    pub time: DeviceTime,
    pub clean_mode: u32,
    pub fan_speed: FanSpeed,
    pub water_level: WaterLevel,
    pub is_deep_clean: bool,
}

impl DeviceOrder {
    pub fn from_entry(entry: &OrderEntry) -> Result<Self, DomainError> {
        let weekdays = u8::try_from(entry.week_day).map_err(|_| DomainError::UnrecognizedCode {
            kind: "weekday mask",
            code: entry.week_day,
        })?;

        Ok(Self {
            id: entry.order_id,
            map_id: entry.clean_info.map_head_id,
            plan_id: entry.clean_info.plan_id,
            is_enabled: entry.enable,
            is_repeat_enabled: entry.repeat,
            weekdays,
            time: DeviceTime::from_minutes(entry.day_time)?,
            clean_mode: entry.clean_info.clean_mode,
            fan_speed: FanSpeed::from_code(entry.clean_info.wind_power)?,
            water_level: WaterLevel::from_code(entry.clean_info.water_level)?,
            is_deep_clean: entry.clean_info.twice_clean,
        })
    }

    pub fn to_entry(&self) -> OrderEntry {
        OrderEntry {
            order_id: self.id,
            enable: self.is_enabled,
            repeat: self.is_repeat_enabled,
            week_day: u32::from(self.weekdays),
            day_time: self.time.to_minutes(),
            clean_info: OrderCleanInfo {
                map_head_id: self.map_id,
                plan_id: self.plan_id,
                clean_mode: self.clean_mode,
                wind_power: self.fan_speed.code(),
                water_level: self.water_level.code(),
                twice_clean: self.is_deep_clean,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> OrderEntry {
        OrderEntry {
            order_id: Id::new(12),
            enable: true,
            repeat: true,
            week_day: 0b0111_1110,
            day_time: 9 * 60 + 15,
            clean_info: OrderCleanInfo {
                map_head_id: Id::new(4),
                plan_id: 2,
                clean_mode: 0,
                wind_power: 3,
                water_level: 1,
                twice_clean: false,
            },
        }
    }

    #[test]
    fn decodes_entry() {
        let order = DeviceOrder::from_entry(&entry()).unwrap();
        assert_eq!(order.id, Id::new(12));
        assert_eq!(order.time.to_string(), "09:15");
        assert_eq!(order.fan_speed, FanSpeed::High);
        assert_eq!(order.to_entry(), entry());
    }

    #[test]
    fn unknown_fan_code_is_rejected() {
        let mut bad = entry();
        bad.clean_info.wind_power = 9;
        assert!(matches!(
            DeviceOrder::from_entry(&bad),
            Err(DomainError::UnrecognizedCode { kind: "fan speed", code: 9 })
        ));
    }
}
