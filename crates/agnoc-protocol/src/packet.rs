use std::fmt;

use agnoc_frame::{Frame, FrameError, MAX_BODY_SIZE};
use bytes::{Buf, BufMut, BytesMut};
use tracing::debug;

use crate::codec::Codec;
use crate::error::{CodecError, ProtocolError, Result};
use crate::id::Id;
use crate::opcodes::{lookup_name, OpName};
use crate::payload::Payload;

/// Envelope ahead of every payload: user id (4) + device id (4).
pub const ENVELOPE_SIZE: usize = 8;

/// Opcode of a packet: registered, or a raw code seen on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Known(OpName),
    Unknown(u16),
}

impl Opcode {
    pub fn from_code(code: u16) -> Self {
        match lookup_name(code) {
            Ok(opname) => Opcode::Known(opname),
            Err(_) => Opcode::Unknown(code),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Opcode::Known(opname) => opname.code(),
            Opcode::Unknown(code) => code,
        }
    }

    pub fn opname(self) -> Option<OpName> {
        match self {
            Opcode::Known(opname) => Some(opname),
            Opcode::Unknown(_) => None,
        }
    }
}

impl From<OpName> for Opcode {
    fn from(opname: OpName) -> Self {
        Opcode::Known(opname)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Known(opname) => f.write_str(opname.as_str()),
            Opcode::Unknown(code) => write!(f, "{code:#06x}"),
        }
    }
}

/// One decoded protocol frame. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    user_id: Id,
    device_id: Id,
    opcode: Opcode,
    payload: Payload,
}

impl Packet {
    /// Outbound packets always carry a registered opcode.
    pub fn new(user_id: Id, device_id: Id, opname: OpName, payload: impl Into<Payload>) -> Self {
        Self {
            user_id,
            device_id,
            opcode: Opcode::Known(opname),
            payload: payload.into(),
        }
    }

    pub fn user_id(&self) -> Id {
        self.user_id
    }

    pub fn device_id(&self) -> Id {
        self.device_id
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn opname(&self) -> Option<OpName> {
        self.opcode.opname()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// A new packet with the same ids, e.g. an ack for this one.
    pub fn reply(&self, opname: OpName, payload: impl Into<Payload>) -> Packet {
        Packet::new(self.user_id, self.device_id, opname, payload)
    }

    /// Frame this packet, serializing the payload with `codec`.
    pub fn to_frame(&self, codec: &dyn Codec) -> Result<Frame> {
        let payload = match (self.opcode, &self.payload) {
            (Opcode::Known(opname), payload) => codec.encode(opname, payload)?,
            (Opcode::Unknown(_), Payload::Raw(bytes)) => bytes.clone(),
            (Opcode::Unknown(code), _) => return Err(CodecError::Unregistered(code).into()),
        };

        let size = ENVELOPE_SIZE + payload.len();
        if size > MAX_BODY_SIZE {
            return Err(FrameError::BodyTooLarge {
                size,
                max: MAX_BODY_SIZE,
            }
            .into());
        }

        let mut body = BytesMut::with_capacity(size);
        body.put_u32_le(self.user_id.value());
        body.put_u32_le(self.device_id.value());
        body.put_slice(&payload);

        Ok(Frame::new(self.opcode.code(), body.freeze()))
    }

    /// Parse the envelope of `frame` and decode its payload.
    ///
    /// Unregistered opcodes are not an error: the packet keeps the raw code
    /// and a [`Payload::Raw`] body.
    pub fn from_frame(frame: Frame, codec: &dyn Codec) -> Result<Packet> {
        let Frame { opcode, mut body } = frame;
        if body.len() < ENVELOPE_SIZE {
            return Err(ProtocolError::Truncated {
                len: body.len(),
                need: ENVELOPE_SIZE,
            });
        }

        let user_id = Id::new(body.get_u32_le());
        let device_id = Id::new(body.get_u32_le());
        let opcode = Opcode::from_code(opcode);

        let payload = match opcode {
            Opcode::Known(opname) => codec.decode(opname, &body)?,
            Opcode::Unknown(code) => {
                debug!(code = format_args!("{code:#06x}"), len = body.len(), "unregistered opcode");
                Payload::Raw(body)
            }
        };

        Ok(Packet {
            user_id,
            device_id,
            opcode,
            payload,
        })
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} user={} device={}",
            self.opcode, self.user_id, self.device_id
        )
    }
}
