use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: opcode (2) + length (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Largest body the 16-bit length field can describe.
pub const MAX_BODY_SIZE: usize = u16::MAX as usize;

/// One complete frame: opcode plus opaque body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw 16-bit opcode, resolved against the registry by upper layers.
    pub opcode: u16,
    /// The frame body.
    pub body: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(opcode: u16, body: impl Into<Bytes>) -> Self {
        Self {
            opcode,
            body: body.into(),
        }
    }

    /// The total wire size of this frame (header + body).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.body.len()
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────┬──────────────────┐
/// │ Opcode (2B)  │ Length (2B)  │ Body             │
/// │ LE           │ LE           │ (Length bytes)   │
/// └──────────────┴──────────────┴──────────────────┘
/// ```
pub fn encode_frame(opcode: u16, body: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u16::try_from(body.len()).map_err(|_| FrameError::BodyTooLarge {
        size: body.len(),
        max: MAX_BODY_SIZE,
    })?;
    dst.reserve(HEADER_SIZE + body.len());
    dst.put_u16_le(opcode);
    dst.put_u16_le(len);
    dst.put_slice(body);
    Ok(())
}

/// Split one whole frame off the front of `src`.
///
/// `Ok(None)` leaves `src` untouched until enough bytes have arrived. The
/// declared length is checked against `max_body` as soon as the header is in.
pub fn decode_frame(src: &mut BytesMut, max_body: usize) -> Result<Option<Frame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    let opcode = u16::from_le_bytes([src[0], src[1]]);
    let body_len = usize::from(u16::from_le_bytes([src[2], src[3]]));

    if body_len > max_body {
        tracing::debug!(opcode, body_len, max_body, "frame header over size limit");
        return Err(FrameError::BodyTooLarge {
            size: body_len,
            max: max_body,
        });
    }

    let total = HEADER_SIZE + body_len;
    if src.len() < total {
        src.reserve(total - src.len());
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let body = src.split_to(body_len).freeze();

    Ok(Some(Frame { opcode, body }))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum accepted body size in bytes. Default: the 16-bit ceiling.
    pub max_body_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_body_size: MAX_BODY_SIZE,
        }
    }
}
