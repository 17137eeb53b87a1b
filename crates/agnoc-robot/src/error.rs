use std::time::Duration;

use agnoc_protocol::OpName;
use agnoc_session::SessionError;

/// Domain rule violations and invalid arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Rejected before any network I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A raw telemetry code outside the documented table.
    #[error("unrecognized {kind} code {code}")]
    UnrecognizedCode { kind: &'static str, code: u32 },

    #[error("{0}: map not loaded")]
    MapNotLoaded(&'static str),

    /// The device did not confirm a mode transition in time.
    #[error("unable to change robot to {0} mode")]
    ModeChange(&'static str),
}

/// Errors returned by robot commands.
#[derive(Debug, thiserror::Error)]
pub enum RobotError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("no {opname} response after {timeout:?}")]
    Timeout { opname: OpName, timeout: Duration },

    #[error("unexpected payload in {0} response")]
    UnexpectedPayload(OpName),

    /// The command needs an opcode with no confirmed wire code. Nothing is
    /// sent.
    #[error("{command} is unsupported: {opname} has no known wire code")]
    Unsupported {
        command: &'static str,
        opname: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, RobotError>;
