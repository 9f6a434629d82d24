use crate::target::Target;

/// Errors that can occur in trapper transport operations.
///
/// Variants that carry an I/O error display the underlying message as-is;
/// the target is kept as structured data for callers that want it.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The target address is not usable (empty host, port out of range).
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The target host name could not be resolved.
    #[error("{source}")]
    Resolve {
        target: Target,
        source: std::io::Error,
    },

    /// Every resolved address refused or failed the connection.
    #[error("{source}")]
    Connect {
        target: Target,
        source: std::io::Error,
    },

    /// An I/O error occurred on the connected stream.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// The underlying I/O error, if this failure came from the socket.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            TransportError::Resolve { source, .. } | TransportError::Connect { source, .. } => {
                Some(source)
            }
            TransportError::Io(err) => Some(err),
            TransportError::InvalidTarget(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
