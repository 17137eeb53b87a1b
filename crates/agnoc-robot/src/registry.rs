//! Id-addressed arena of device entities.
//!
//! Robots hold a [`DeviceHandle`] into the arena rather than owning their
//! device, so the router and observers can read device state without going
//! through the robot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use agnoc_protocol::Id;

use crate::domain::{Device, DeviceModel};

/// Shared handle to one device. Never hold the lock across an `.await`.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    id: Id,
    inner: Arc<Mutex<Device>>,
}

impl DeviceHandle {
    pub fn new(device: Device) -> Self {
        Self {
            id: device.id(),
            inner: Arc::new(Mutex::new(device)),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, Device> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read<R>(&self, f: impl FnOnce(&Device) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Device) -> R) -> R {
        f(&mut self.lock())
    }

    /// A point-in-time copy.
    pub fn snapshot(&self) -> Device {
        self.lock().clone()
    }
}

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<Id, DeviceHandle>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Id) -> Option<DeviceHandle> {
        self.devices.get(&id).cloned()
    }

    /// Existing handle for `id`, or a fresh device of `model`.
    pub fn get_or_insert(&mut self, id: Id, model: DeviceModel) -> DeviceHandle {
        self.devices
            .entry(id)
            .or_insert_with(|| DeviceHandle::new(Device::new(id, model)))
            .clone()
    }

    pub fn remove(&mut self, id: Id) -> Option<DeviceHandle> {
        self.devices.remove(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.devices.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
