//! Domain model of a robot vacuum, decoupled from the wire payloads.

pub mod consumable;
pub mod device;
pub mod map;
pub mod order;
pub mod settings;
pub mod status;

pub use consumable::{ConsumableType, DeviceConsumable};
pub use device::{Device, DeviceModel, DeviceSystem, DeviceWlan, User};
pub use map::{Coordinate, DeviceMap, DeviceMapUpdate, MapHeader, Position, Room, Zone};
pub use order::DeviceOrder;
pub use settings::{DeviceConfig, DeviceTime, QuietHours, Voice};
pub use status::{Battery, DeviceMode, DeviceState, DeviceStatus, FanSpeed, WaterLevel};

/// Drive commands while in manual control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManualMode {
    Forward,
    Left,
    Right,
    Backward,
    Stop,
    Init,
}

impl ManualMode {
    pub fn code(self) -> u32 {
        match self {
            Self::Forward => 1,
            Self::Left => 2,
            Self::Right => 3,
            Self::Backward => 4,
            Self::Stop => 5,
            Self::Init => 10,
        }
    }
}
