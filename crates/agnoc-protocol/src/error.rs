use agnoc_frame::FrameError;

use crate::opcodes::OpName;

/// Registry lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown opcode name: {0}")]
    UnknownName(String),

    /// Soft on the receive path: the packet is kept with its raw code.
    #[error("unknown opcode code: {0:#06x}")]
    UnknownCode(u16),
}

/// Payload codec failures.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed {opname} payload: {source}")]
    Decode {
        opname: OpName,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode {opname} payload: {source}")]
    Encode {
        opname: OpName,
        #[source]
        source: serde_json::Error,
    },

    /// Only raw payloads can be sent under an unregistered code.
    #[error("cannot encode structured payload under unregistered opcode {0:#06x}")]
    Unregistered(u16),
}

/// Errors raised while turning frames into packets and back.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("packet body too short for envelope ({len} bytes, need {need})")]
    Truncated { len: usize, need: usize },
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
