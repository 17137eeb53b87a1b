//! Per-device session logic for the agnoc robot link.
//!
//! A [`Robot`] sits on top of a [`Multiplexer`](agnoc_session::Multiplexer)
//! holding the device's links. It answers the device's pushes, keeps the
//! decoded [`domain::Device`] current, and exposes the commands a client can
//! issue. [`SessionRouter`] assigns listener connections to robots by
//! device id.

pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
mod handlers;
pub mod mappers;
pub mod registry;
pub mod robot;
pub mod router;
#[cfg(test)]
mod test_support;

pub use commands::DeviceTimestamp;
pub use config::{
    RobotConfig, DEFAULT_EVENT_CAPACITY, DEFAULT_MODE_CHANGE_TIMEOUT, DEFAULT_RESPONSE_TIMEOUT,
};
pub use error::{DomainError, Result, RobotError};
pub use registry::{DeviceHandle, DeviceRegistry};
pub use robot::{Robot, RobotEvent, USER_OFFLINE_ERROR, USER_OFFLINE_RESULT};
pub use router::SessionRouter;
