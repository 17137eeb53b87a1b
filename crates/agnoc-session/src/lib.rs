//! Session plumbing for the agnoc robot link: one [`Connection`] per byte
//! stream, the per-device [`Multiplexer`], and response waiters.
//!
//! A device keeps up to two links open. Requests and responses carry no
//! transaction id, so a reply is matched to the oldest waiter registered
//! for its opcode name, whichever link it arrives on.

pub mod config;
pub mod connection;
pub mod error;
pub mod listener;
pub mod message;
pub mod multiplexer;
pub mod waiter;

pub use config::{SessionConfig, DEFAULT_IDLE_TIMEOUT};
pub use connection::{
    Connection, ConnectionEvent, ConnectionEventKind, ConnectionHandle, ConnectionId,
};
pub use error::{Result, SessionError};
pub use listener::SessionListener;
pub use message::Message;
pub use multiplexer::{Multiplexer, MAX_CONNECTIONS};
pub use waiter::{Waiter, WaiterRegistry};
