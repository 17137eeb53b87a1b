//! Pure functions from raw telemetry codes to domain values.
//!
//! The tables here are firmware facts; the rule order in [`state`] matters
//! because several work modes satisfy more than one rule.

use agnoc_protocol::payload::{MapInfo, StatusInfo, WorkStatusPush};
use tracing::warn;

use crate::domain::{
    Battery, Coordinate, DeviceMapUpdate, DeviceMode, DeviceState, DeviceStatus, FanSpeed,
    MapHeader, Position, Room, WaterLevel, Zone,
};
use crate::error::DomainError;

/// Raw battery readings run from 0 to this value.
pub const BATTERY_MAX_RAW: u32 = 200;

/// Percent for a raw reading, half percents rounded up (raw 101 is 51%).
/// Readings above [`BATTERY_MAX_RAW`] are rejected, not clamped.
pub fn battery_percent(raw: u32) -> Result<u32, DomainError> {
    if raw > BATTERY_MAX_RAW {
        return Err(DomainError::InvalidArgument(format!(
            "battery reading {raw} above {BATTERY_MAX_RAW}"
        )));
    }
    Ok((raw * 100 + BATTERY_MAX_RAW / 2) / BATTERY_MAX_RAW)
}

pub fn battery(raw: u32) -> Result<Battery, DomainError> {
    Battery::new(battery_percent(raw)?)
}

pub fn state(fault_type: u32, work_mode: u32, charge_status: bool) -> DeviceState {
    if !matches!(fault_type, 0 | 3) || work_mode == 11 {
        return DeviceState::Error;
    }
    if work_mode == 2 {
        return DeviceState::ManualControl;
    }
    if charge_status {
        return DeviceState::Docked;
    }
    match work_mode {
        5 | 10 => DeviceState::Returning,
        1 | 6 | 7 | 20 | 25 | 30 => DeviceState::Cleaning,
        4 | 9 | 31 => DeviceState::Paused,
        0 | 23 | 29 => DeviceState::Idle,
        _ => DeviceState::Unknown,
    }
}

pub fn mode(work_mode: u32) -> DeviceMode {
    match work_mode {
        0 | 1 | 2 | 4 | 5 | 10 | 11 => DeviceMode::None,
        6 | 7 | 9 | 14 | 22 | 36..=40 => DeviceMode::Spot,
        20 | 21 | 24..=28 | 30 | 31 => DeviceMode::Zone,
        32..=35 => DeviceMode::Mop,
        _ => DeviceMode::Unknown,
    }
}

pub fn fan_speed(raw: u32) -> Result<FanSpeed, DomainError> {
    FanSpeed::from_code(raw)
}

pub fn water_level(raw: u32) -> Result<WaterLevel, DomainError> {
    WaterLevel::from_code(raw)
}

// A bad code drops that one field; the rest of the push still applies.
fn lenient<T>(field: &'static str, value: Result<T, DomainError>) -> Option<T> {
    value
        .map_err(|err| warn!(field, error = %err, "ignoring telemetry field"))
        .ok()
}

struct RawStatus {
    battery: u32,
    fault_type: u32,
    work_mode: u32,
    charge_status: bool,
    clean_preference: u32,
    water_level: Option<u32>,
    clean_size: u32,
    clean_time: u32,
}

fn decode_status(raw: RawStatus) -> DeviceStatus {
    DeviceStatus {
        battery: lenient("battery", battery(raw.battery)),
        state: Some(state(raw.fault_type, raw.work_mode, raw.charge_status)),
        mode: Some(mode(raw.work_mode)),
        fan_speed: lenient("fan_speed", fan_speed(raw.clean_preference)),
        water_level: raw
            .water_level
            .and_then(|code| lenient("water_level", water_level(code))),
        clean_size: Some(raw.clean_size),
        clean_time: Some(raw.clean_time),
    }
}

/// Status carried by `DEVICE_MAPID_WORK_STATUS_PUSH_REQ`.
pub fn status_from_push(push: &WorkStatusPush) -> DeviceStatus {
    decode_status(RawStatus {
        battery: push.battery,
        fault_type: push.fault_type,
        work_mode: push.work_mode,
        charge_status: push.charge_status,
        clean_preference: push.clean_preference,
        water_level: push.water_level,
        clean_size: push.clean_size,
        clean_time: push.clean_time,
    })
}

/// Status embedded in a map push.
pub fn status_from_info(info: &StatusInfo) -> DeviceStatus {
    decode_status(RawStatus {
        battery: info.battery_percent,
        fault_type: info.fault_type,
        work_mode: info.working_mode,
        charge_status: info.charge_state,
        clean_preference: info.clean_preference,
        water_level: info.water_level,
        clean_size: info.clean_size,
        clean_time: info.clean_time,
    })
}

pub fn position(pose: &agnoc_protocol::payload::Pose) -> Position {
    Position::new(pose.pose_x, pose.pose_y, pose.pose_phi)
}

/// Map contents of a map push. Rooms without a pixel segment are dropped.
pub fn map_update(info: &MapInfo) -> DeviceMapUpdate {
    let header = info.map_head_info.map(|head| MapHeader {
        id: head.map_head_id,
        size: Coordinate::new(head.size_x, head.size_y),
        min: Coordinate::new(head.min_x, head.min_y),
        max: Coordinate::new(head.max_x, head.max_y),
    });

    let restricted_zones = info
        .wall_list_info
        .as_ref()
        .map(|walls| {
            walls
                .clean_area_list
                .iter()
                .map(|area| Zone {
                    id: area.clean_area_id,
                    coordinates: area
                        .coordinate_list
                        .iter()
                        .map(|p| Coordinate::new(p.x, p.y))
                        .collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    let rooms = match (&info.clean_room_list, &info.room_segment_list) {
        (Some(rooms), Some(segments)) => rooms
            .iter()
            .filter_map(|room| {
                let segment = segments.iter().find(|s| s.room_id == room.room_id)?;
                Some(Room {
                    id: room.room_id,
                    name: room.room_name.clone(),
                    center: Coordinate::new(room.room_x, room.room_y),
                    pixels: segment
                        .room_pixel_list
                        .iter()
                        .map(|p| Coordinate::new(p.x, p.y))
                        .collect(),
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    DeviceMapUpdate {
        header,
        grid: info.map_grid.clone(),
        robot: info.robot_pose_info.as_ref().map(position),
        charger: info.robot_charge_info.as_ref().map(position),
        current_spot: info.spot_info.as_ref().map(position),
        restricted_zones,
        rooms,
    }
}

#[cfg(test)]
mod tests {
    use agnoc_protocol::payload::{CleanRoom, MapHeadInfo, Point, RoomSegment};
    use agnoc_protocol::Id;

    use super::*;

    #[test]
    fn battery_scale() {
        assert_eq!(battery_percent(0), Ok(0));
        assert_eq!(battery_percent(100), Ok(50));
        assert_eq!(battery_percent(200), Ok(100));
    }

    #[test]
    fn odd_battery_readings_round_half_up() {
        assert_eq!(battery_percent(1), Ok(1));
        assert_eq!(battery_percent(101), Ok(51));
        assert_eq!(battery_percent(199), Ok(100));
    }

    #[test]
    fn battery_above_scale_is_rejected() {
        assert!(matches!(
            battery(201),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(battery_percent(u32::MAX).is_err());
    }

    #[test]
    fn manual_control_beats_docked() {
        assert_eq!(state(0, 2, true), DeviceState::ManualControl);
        assert_eq!(state(0, 1, true), DeviceState::Docked);
    }

    #[test]
    fn state_priority_list() {
        assert_eq!(state(1, 0, false), DeviceState::Error);
        assert_eq!(state(0, 11, true), DeviceState::Error);
        assert_eq!(state(3, 5, false), DeviceState::Returning);
        assert_eq!(state(0, 10, false), DeviceState::Returning);
        for wm in [1, 6, 7, 20, 25, 30] {
            assert_eq!(state(0, wm, false), DeviceState::Cleaning, "workMode {wm}");
        }
        for wm in [4, 9, 31] {
            assert_eq!(state(0, wm, false), DeviceState::Paused, "workMode {wm}");
        }
        for wm in [0, 23, 29] {
            assert_eq!(state(0, wm, false), DeviceState::Idle, "workMode {wm}");
        }
        assert_eq!(state(0, 99, false), DeviceState::Unknown);
    }

    #[test]
    fn mode_table() {
        for wm in [0, 1, 2, 4, 5, 10, 11] {
            assert_eq!(mode(wm), DeviceMode::None, "workMode {wm}");
        }
        for wm in [6, 7, 9, 14, 22, 36, 37, 38, 39, 40] {
            assert_eq!(mode(wm), DeviceMode::Spot, "workMode {wm}");
        }
        for wm in [20, 21, 24, 25, 26, 27, 28, 30, 31] {
            assert_eq!(mode(wm), DeviceMode::Zone, "workMode {wm}");
        }
        for wm in [32, 33, 34, 35] {
            assert_eq!(mode(wm), DeviceMode::Mop, "workMode {wm}");
        }
        assert_eq!(mode(3), DeviceMode::Unknown);
        assert_eq!(mode(41), DeviceMode::Unknown);
    }

    #[test]
    fn mappers_are_deterministic() {
        for fault in 0..6 {
            for wm in 0..45 {
                for charge in [false, true] {
                    assert_eq!(state(fault, wm, charge), state(fault, wm, charge));
                }
                assert_eq!(mode(wm), mode(wm));
            }
        }
    }

    #[test]
    fn level_codes() {
        assert_eq!(fan_speed(0).unwrap(), FanSpeed::Off);
        assert_eq!(fan_speed(3).unwrap(), FanSpeed::High);
        assert!(matches!(
            fan_speed(4),
            Err(DomainError::UnrecognizedCode { kind: "fan speed", code: 4 })
        ));
        assert_eq!(water_level(2).unwrap(), WaterLevel::Medium);
    }

    #[test]
    fn push_with_bad_fan_code_keeps_other_fields() {
        let status = status_from_push(&WorkStatusPush {
            battery: 200,
            fault_type: 0,
            work_mode: 20,
            charge_status: false,
            clean_preference: 7,
            clean_size: 3,
            clean_time: 60,
            fault_code: None,
            water_level: None,
        });
        assert_eq!(status.battery.map(Battery::percent), Some(100));
        assert_eq!(status.state, Some(DeviceState::Cleaning));
        assert_eq!(status.mode, Some(DeviceMode::Zone));
        assert_eq!(status.fan_speed, None);
    }

    #[test]
    fn map_update_joins_rooms_with_segments() {
        let info = MapInfo {
            map_head_info: Some(MapHeadInfo {
                map_head_id: Id::new(5),
                size_x: 10.0,
                size_y: 10.0,
                min_x: 0.0,
                min_y: 0.0,
                max_x: 10.0,
                max_y: 10.0,
            }),
            clean_room_list: Some(vec![
                CleanRoom {
                    room_id: Id::new(1),
                    room_name: "Hall".into(),
                    room_x: 1.0,
                    room_y: 2.0,
                },
                CleanRoom {
                    room_id: Id::new(2),
                    room_name: "Orphan".into(),
                    room_x: 0.0,
                    room_y: 0.0,
                },
            ]),
            room_segment_list: Some(vec![RoomSegment {
                room_id: Id::new(1),
                room_pixel_list: vec![Point { x: 1.0, y: 1.0 }],
            }]),
            ..MapInfo::default()
        };

        let update = map_update(&info);
        assert_eq!(update.header.map(|h| h.id), Some(Id::new(5)));
        assert_eq!(update.rooms.len(), 1);
        assert_eq!(update.rooms[0].name, "Hall");
        assert!(update.restricted_zones.is_empty());
    }
}
