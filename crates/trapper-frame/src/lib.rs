//! `ZBXD` envelope framing for the trapper protocol.
//!
//! Every message on the wire is framed with:
//! - A 4-byte magic sequence ("ZBXD")
//! - A 1-byte protocol version (0x01; not enforced on decode)
//! - An 8-byte little-endian payload length
//!
//! followed by the UTF-8 JSON payload. [`FrameReader`] tolerates short reads
//! and reports truncated headers and bodies as distinct errors.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, decode_header, encode_frame, Frame, FrameConfig, Header, DEFAULT_MAX_PAYLOAD,
    HEADER_SIZE, MAGIC, PROTOCOL_VERSION,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;
