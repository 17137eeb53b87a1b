use std::fmt;
use std::str::FromStr;

use agnoc_protocol::Id;
use serde::Serialize;

use super::consumable::DeviceConsumable;
use super::map::{DeviceMap, DeviceMapUpdate};
use super::order::DeviceOrder;
use super::settings::DeviceConfig;
use super::status::DeviceStatus;
use crate::error::DomainError;

/// Hardware family. The C3090 supports a narrower map mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceModel {
    C3090,
    C3490,
    #[default]
    Unknown,
}

impl DeviceModel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::C3090 => "C3090",
            Self::C3490 => "C3490",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for DeviceModel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "C3090" => Ok(Self::C3090),
            "C3490" => Ok(Self::C3490),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(DomainError::InvalidArgument(format!("invalid model: {s}"))),
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceSystem {
    pub model: DeviceModel,
    pub software_version: Option<String>,
    pub hardware_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceWlan {
    pub ipv4: String,
    pub ssid: String,
    pub port: u16,
    pub mask: String,
    pub mac: String,
}

/// The account the session is authorized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Id,
}

impl User {
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

/// Everything known about one appliance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    id: Id,
    system: DeviceSystem,
    status: Option<DeviceStatus>,
    map: Option<DeviceMap>,
    config: Option<DeviceConfig>,
    consumables: Vec<DeviceConsumable>,
    orders: Vec<DeviceOrder>,
    wlan: Option<DeviceWlan>,
}

impl Device {
    pub fn new(id: Id, model: DeviceModel) -> Self {
        Self {
            id,
            system: DeviceSystem {
                model,
                ..DeviceSystem::default()
            },
            status: None,
            map: None,
            config: None,
            consumables: Vec::new(),
            orders: Vec::new(),
            wlan: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn system(&self) -> &DeviceSystem {
        &self.system
    }

    pub fn status(&self) -> Option<&DeviceStatus> {
        self.status.as_ref()
    }

    pub fn map(&self) -> Option<&DeviceMap> {
        self.map.as_ref()
    }

    pub fn map_mut(&mut self) -> Option<&mut DeviceMap> {
        self.map.as_mut()
    }

    pub fn config(&self) -> Option<&DeviceConfig> {
        self.config.as_ref()
    }

    pub fn config_mut(&mut self) -> Option<&mut DeviceConfig> {
        self.config.as_mut()
    }

    pub fn consumables(&self) -> &[DeviceConsumable] {
        &self.consumables
    }

    pub fn orders(&self) -> &[DeviceOrder] {
        &self.orders
    }

    pub fn wlan(&self) -> Option<&DeviceWlan> {
        self.wlan.as_ref()
    }

    pub fn update_status(&mut self, update: DeviceStatus) {
        match self.status.as_mut() {
            Some(status) => status.merge(update),
            None => self.status = Some(update),
        }
    }

    /// Merge a map push. Returns `false` when there is no map yet and the
    /// push cannot start one.
    pub fn update_map(&mut self, update: DeviceMapUpdate) -> bool {
        match self.map.as_mut() {
            Some(map) => {
                map.merge(update);
                true
            }
            None => {
                self.map = DeviceMap::from_update(update);
                self.map.is_some()
            }
        }
    }

    pub fn update_system(&mut self, software_version: String, hardware_version: String) {
        self.system.software_version = Some(software_version);
        self.system.hardware_version = Some(hardware_version);
    }

    pub fn update_config(&mut self, config: DeviceConfig) {
        self.config = Some(config);
    }

    pub fn update_consumables(&mut self, consumables: Vec<DeviceConsumable>) {
        self.consumables = consumables;
    }

    pub fn update_orders(&mut self, orders: Vec<DeviceOrder>) {
        self.orders = orders;
    }

    pub fn update_wlan(&mut self, wlan: DeviceWlan) {
        self.wlan = Some(wlan);
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device {} ({})", self.id, self.system.model)
    }
}
