use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::debug;

use crate::codec::{decode_header, Frame, FrameConfig, HEADER_SIZE, PROTOCOL_VERSION};
use crate::error::{FrameError, Result};

/// Largest body growth step.
const READ_CHUNK: usize = 64 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally: a single `read` may return fewer bytes
/// than requested without meaning end-of-stream, so header and payload are
/// each filled in a loop. Only `Ok(0)` is treated as end-of-stream. The reader
/// consumes exactly one frame's bytes and never reads past it.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame (blocking).
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut header = [0u8; HEADER_SIZE];
        let received = self.fill(&mut header)?;
        if received < HEADER_SIZE {
            return Err(FrameError::IncompleteHeader { received });
        }

        let header = decode_header(&header, self.config.max_payload_size)?;
        if header.version != PROTOCOL_VERSION {
            debug!(version = header.version, "peer sent unexpected protocol version");
        }

        let payload = self.read_body(header.length)?;

        debug!(
            version = header.version,
            length = header.length,
            "read frame"
        );
        Ok(Frame {
            version: header.version,
            payload: payload.freeze(),
        })
    }

    /// Read exactly `length` payload bytes, growing the buffer one chunk at a
    /// time so memory tracks the bytes actually received, not the announced
    /// length.
    fn read_body(&mut self, length: usize) -> Result<BytesMut> {
        let mut payload = BytesMut::with_capacity(length.min(READ_CHUNK));
        while payload.len() < length {
            let start = payload.len();
            let want = (length - start).min(READ_CHUNK);
            payload.resize(start + want, 0);

            let got = self.fill(&mut payload[start..])?;
            if got < want {
                return Err(FrameError::IncompleteBody {
                    expected: length,
                    received: start + got,
                });
            }
        }
        Ok(payload)
    }

    /// Fill `buf` from the stream, stopping early only at end-of-stream.
    ///
    /// Returns the number of bytes actually read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(filled)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
