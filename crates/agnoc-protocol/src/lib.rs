//! Opcode registry, packet envelope and payload codec for the agnoc robot
//! link.
//!
//! A frame body is laid out as:
//! - 4-byte little-endian user id
//! - 4-byte little-endian device id
//! - codec-serialized payload
//!
//! The opcode itself lives in the frame header (`agnoc-frame`).

pub mod codec;
pub mod error;
pub mod id;
pub mod opcodes;
pub mod packet;
pub mod payload;

pub use codec::{Codec, JsonCodec};
pub use error::{CodecError, ProtocolError, RegistryError, Result};
pub use id::Id;
pub use opcodes::{lookup_code, lookup_name, OpName, OpcodeBand};
pub use packet::{Opcode, Packet, ENVELOPE_SIZE};
pub use payload::Payload;
