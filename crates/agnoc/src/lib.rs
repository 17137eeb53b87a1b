//! Session server for robot vacuums speaking the agnoc link protocol.
//!
//! The device dials in over TCP, keeps up to two links open, and talks in
//! opcode-tagged frames. This crate bundles the layers:
//!
//! - [`frame`]: opcode-prefixed wire framing
//! - [`protocol`]: opcode registry, packet envelope and payload codec
//! - [`session`]: connections, multiplexer and response waiters (behind `session`)
//! - [`robot`]: per-device session, telemetry decoding and commands (behind `session`)

/// Re-export frame types.
pub mod frame {
    pub use agnoc_frame::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use agnoc_protocol::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use agnoc_session::*;
}

/// Re-export robot types (requires `session` feature).
#[cfg(feature = "session")]
pub mod robot {
    pub use agnoc_robot::*;
}
