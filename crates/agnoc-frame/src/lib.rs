//! Opcode-prefixed wire framing for the agnoc robot link.
//!
//! Every message on the link is framed with:
//! - A 2-byte little-endian opcode
//! - A 2-byte little-endian body length
//! - The body itself (opaque at this layer)
//!
//! Callers always get complete frames, however the stream was fragmented.

pub mod codec;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod reader;
pub mod writer;

pub use codec::{decode_frame, encode_frame, Frame, FrameConfig, HEADER_SIZE, MAX_BODY_SIZE};
pub use error::{FrameError, Result};
#[cfg(feature = "async")]
pub use framed::FrameCodec;
pub use reader::FrameReader;
pub use writer::FrameWriter;
