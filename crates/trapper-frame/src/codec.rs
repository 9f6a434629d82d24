use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: magic (4) + version (1) + length (8) = 13 bytes.
pub const HEADER_SIZE: usize = 13;

/// Magic bytes: "ZBXD".
pub const MAGIC: [u8; 4] = *b"ZBXD";

/// Protocol version written on every outbound frame.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Version byte as sent by the peer. Not enforced.
    pub version: u8,
    /// Announced payload length in bytes.
    pub length: usize,
}

/// A complete frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The version byte the frame carried.
    pub version: u8,
    /// The JSON payload bytes.
    pub payload: Bytes,
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬─────────┬──────────────┬──────────────────┐
/// │ Magic (4B)   │ Version │ Length       │ Payload          │
/// │ "ZBXD"       │ (1B)    │ (8B LE u64)  │ (Length bytes)   │
/// │              │ 0x01    │              │ UTF-8 JSON       │
/// └──────────────┴─────────┴──────────────┴──────────────────┘
/// ```
pub fn encode_frame(payload: &[u8], dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u8(PROTOCOL_VERSION);
    dst.put_u64_le(payload.len() as u64);
    dst.put_slice(payload);
}

/// Validate and decode a frame header.
///
/// The magic is checked before anything else, so a bad magic is reported
/// regardless of what the remaining bytes contain.
pub fn decode_header(header: &[u8; HEADER_SIZE], max_payload: usize) -> Result<Header> {
    if header[0..4] != MAGIC {
        let mut found = [0u8; 4];
        found.copy_from_slice(&header[0..4]);
        return Err(FrameError::BadMagic { found });
    }

    let version = header[4];
    let mut len_bytes = &header[5..HEADER_SIZE];
    let length = len_bytes.get_u64_le();

    // Lengths with the top bit set are negative on peers that use signed sizes.
    if length > i64::MAX as u64 || length > max_payload as u64 {
        return Err(FrameError::InvalidLength {
            length,
            max: max_payload,
        });
    }

    Ok(Header {
        version,
        length: length as usize,
    })
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Frame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(&src[..HEADER_SIZE]);
    let header = decode_header(&header, max_payload)?;

    let total = HEADER_SIZE + header.length;
    if src.len() < total {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(header.length).freeze();

    Ok(Some(Frame {
        version: header.version,
        payload,
    }))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum payload size in bytes, inbound and outbound. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_SAMPLE: &[u8] =
        br#"{"request":"sender data","data":[{"host":"h","key":"k","value":"v"}]}"#;

    #[test]
    fn test_encode_layout() {
        let mut buf = BytesMut::new();
        encode_frame(SINGLE_SAMPLE, &mut buf);

        assert_eq!(buf.len(), HEADER_SIZE + SINGLE_SAMPLE.len());
        assert_eq!(&buf[0..4], b"ZBXD");
        assert_eq!(buf[4], 1);
        assert_eq!(
            u64::from_le_bytes(buf[5..13].try_into().unwrap()),
            SINGLE_SAMPLE.len() as u64
        );
        assert_eq!(&buf[13..], SINGLE_SAMPLE);
    }

    #[test]
    fn test_length_is_little_endian() {
        let payload = vec![b'x'; 0x0102];
        let mut buf = BytesMut::new();
        encode_frame(&payload, &mut buf);

        assert_eq!(&buf[5..13], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        encode_frame(SINGLE_SAMPLE, &mut buf);

        let frame = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();

        assert_eq!(frame.version, PROTOCOL_VERSION);
        assert_eq!(frame.payload.as_ref(), SINGLE_SAMPLE);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&b"ZBXD\x01\x00"[..]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"{\"response\":\"success\"}", &mut buf);
        buf.truncate(HEADER_SIZE + 2);

        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_bad_magic_ignores_rest_of_header() {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(b"XXXX");
        header[4] = PROTOCOL_VERSION;
        header[5..].copy_from_slice(&u64::MAX.to_le_bytes());

        let err = decode_header(&header, DEFAULT_MAX_PAYLOAD).unwrap_err();
        assert!(matches!(err, FrameError::BadMagic { found } if &found == b"XXXX"));
        assert!(err.to_string().contains("bad magic"));
    }

    #[test]
    fn test_unknown_version_accepted() {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&MAGIC);
        header[4] = 0x03;
        header[5..].copy_from_slice(&7u64.to_le_bytes());

        let decoded = decode_header(&header, DEFAULT_MAX_PAYLOAD).unwrap();
        assert_eq!(decoded.version, 0x03);
        assert_eq!(decoded.length, 7);
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut header = [0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&MAGIC);
        header[4] = PROTOCOL_VERSION;
        header[5..].copy_from_slice(&(-1i64).to_le_bytes());

        let err = decode_header(&header, usize::MAX).unwrap_err();
        assert!(matches!(err, FrameError::InvalidLength { length, .. } if length == u64::MAX));
        assert!(err.to_string().contains("invalid length"));
    }

    #[test]
    fn test_length_over_cap_rejected() {
        let mut buf = BytesMut::new();
        buf.put_slice(&MAGIC);
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u64_le(1024 * 1024 * 32);

        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(FrameError::InvalidLength { .. })));
    }

    #[test]
    fn test_length_at_cap_accepted() {
        let mut buf = BytesMut::new();
        encode_frame(b"1234", &mut buf);

        let frame = decode_frame(&mut buf, 4).unwrap().unwrap();
        assert_eq!(frame.payload.as_ref(), b"1234");
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(b"", &mut buf);

        let frame = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();
        assert!(frame.payload.is_empty());
    }
}
