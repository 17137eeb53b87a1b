use agnoc_protocol::ProtocolError;

/// Errors that can occur in session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The awaited response can no longer arrive: the multiplexer lost its
    /// last connection or was closed.
    #[error("response wait cancelled: session has no live connection")]
    Cancelled,

    /// Nothing was sent because no connection was available.
    #[error("no live connection")]
    NoConnection,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
