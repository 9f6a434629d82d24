use crate::codec::HEADER_SIZE;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The first four header bytes are not `ZBXD`.
    #[error("bad magic (expected \"ZBXD\", found \"{}\")", .found.escape_ascii())]
    BadMagic { found: [u8; 4] },

    /// The stream ended before a full header was received.
    #[error("incomplete header ({received} of {size} bytes)", size = HEADER_SIZE)]
    IncompleteHeader { received: usize },

    /// The stream ended before the announced payload was received.
    #[error("incomplete body ({received} of {expected} bytes)")]
    IncompleteBody { expected: usize, received: usize },

    /// The header announces a length that is negative as a signed value or
    /// above the configured cap.
    #[error("invalid length {length} (max {max})")]
    InvalidLength { length: u64, max: usize },

    /// An outbound payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The peer stopped accepting bytes mid-frame.
    #[error("connection closed (incomplete frame write)")]
    ConnectionClosed,

    /// An I/O error occurred while reading or writing frames.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
