use trapper_frame::FrameError;
use trapper_transport::TransportError;

/// The broad class of a [`SenderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid caller input, detected before any I/O.
    Argument,
    /// Connect, write or read failure on the socket.
    Transport,
    /// Well-formed I/O carrying a malformed envelope or reply document.
    Protocol,
    /// The collector answered, but did not report success.
    Application,
}

/// Envelope or reply-document violations.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The reply envelope broke the frame format.
    #[error(transparent)]
    Frame(FrameError),

    /// The payload is not a JSON document.
    #[error("malformed response body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// The reply document has no `response` field.
    #[error("missing response field in {body}")]
    MissingResponse { body: serde_json::Value },
}

/// The single outcome of a failed send.
#[derive(Debug, thiserror::Error)]
pub enum SenderError {
    /// Invalid caller input. Raised before any connection is attempted.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Socket failure; the message is the underlying I/O error's.
    #[error(transparent)]
    Transport(TransportError),

    /// The collector's reply could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The collector rejected the submission.
    #[error("collector reported failure: {info}")]
    Application {
        /// The collector's `info` string, or `No additional info.`.
        info: String,
        /// The full decoded reply.
        body: serde_json::Value,
    },
}

impl SenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SenderError::Argument(_) => ErrorKind::Argument,
            SenderError::Transport(_) => ErrorKind::Transport,
            SenderError::Protocol(_) => ErrorKind::Protocol,
            SenderError::Application { .. } => ErrorKind::Application,
        }
    }

    pub(crate) fn argument(message: impl Into<String>) -> Self {
        SenderError::Argument(message.into())
    }
}

impl From<TransportError> for SenderError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidTarget(message) => SenderError::Argument(message),
            other => SenderError::Transport(other),
        }
    }
}

impl From<FrameError> for SenderError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::PayloadTooLarge { size, max } => SenderError::Argument(format!(
                "request payload too large ({size} bytes, max {max})"
            )),
            FrameError::ConnectionClosed => SenderError::Transport(TransportError::Io(
                std::io::Error::from(std::io::ErrorKind::WriteZero),
            )),
            FrameError::Io(err) => SenderError::Transport(TransportError::Io(err)),
            violation => ProtocolError::Frame(violation).into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_is_not_reworded() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset the line");
        let err = SenderError::from(FrameError::Io(io));

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "peer reset the line");
    }

    #[test]
    fn frame_violations_map_to_protocol() {
        let cases = [
            (FrameError::BadMagic { found: *b"XXXX" }, "bad magic"),
            (
                FrameError::IncompleteHeader { received: 3 },
                "incomplete header",
            ),
            (
                FrameError::IncompleteBody {
                    expected: 10,
                    received: 2,
                },
                "incomplete body",
            ),
            (
                FrameError::InvalidLength {
                    length: u64::MAX,
                    max: 16,
                },
                "invalid length",
            ),
        ];

        for (frame_err, needle) in cases {
            let err = SenderError::from(frame_err);
            assert_eq!(err.kind(), ErrorKind::Protocol);
            assert!(err.to_string().starts_with("protocol error: "), "{err}");
            assert!(err.to_string().contains(needle), "{err}");
            assert!(matches!(err, SenderError::Protocol(ProtocolError::Frame(_))));
        }
    }

    #[test]
    fn closed_connection_is_transport_error() {
        let err = SenderError::from(FrameError::ConnectionClosed);
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn oversized_request_is_argument_error() {
        let err = SenderError::from(FrameError::PayloadTooLarge { size: 10, max: 4 });
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn invalid_target_is_argument_error() {
        let err = SenderError::from(TransportError::InvalidTarget("host must not be empty".into()));
        assert_eq!(err.kind(), ErrorKind::Argument);
    }
}
