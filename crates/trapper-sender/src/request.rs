use bytes::BytesMut;
use serde::Serialize;
use trapper_frame::{encode_frame, FrameConfig};

use crate::error::{Result, SenderError};
use crate::sample::{validate_ns, Sample};

/// Value of the `request` field for sample submissions.
pub const SENDER_DATA: &str = "sender data";

/// Timestamp applied to a whole submission.
///
/// The collector decides how this combines with per-sample timestamps; the
/// client passes it through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchClock {
    /// Unix timestamp in seconds.
    pub clock: i64,
    /// Nanosecond component; sent as `0` when absent.
    pub ns: Option<i64>,
}

impl BatchClock {
    pub fn new(clock: i64) -> Self {
        Self { clock, ns: None }
    }

    pub fn with_ns(clock: i64, ns: i64) -> Self {
        Self {
            clock,
            ns: Some(ns),
        }
    }
}

#[derive(Serialize)]
struct SenderRequest<'a> {
    request: &'static str,
    data: &'a [Sample],
    #[serde(skip_serializing_if = "Option::is_none")]
    clock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ns: Option<u32>,
}

/// Serialize a submission to its JSON payload.
///
/// `ns` is only emitted alongside `clock`, defaulting to `0`. An `ns` given
/// without a `clock` is still range checked.
pub fn encode_request_json(
    samples: &[Sample],
    clock: Option<i64>,
    ns: Option<i64>,
) -> Result<Vec<u8>> {
    if samples.is_empty() {
        return Err(SenderError::argument("batch must contain at least one sample"));
    }
    let ns = ns.map(validate_ns).transpose()?;

    let request = SenderRequest {
        request: SENDER_DATA,
        data: samples,
        clock,
        ns: clock.map(|_| ns.unwrap_or(0)),
    };

    serde_json::to_vec(&request)
        .map_err(|err| SenderError::argument(format!("request is not serializable: {err}")))
}

/// Serialize a submission and wrap it in a `ZBXD` frame.
///
/// All checks happen here, so a request that fails to encode never reaches
/// the network.
pub fn encode_request(
    samples: &[Sample],
    clock: Option<i64>,
    ns: Option<i64>,
    config: &FrameConfig,
) -> Result<BytesMut> {
    let json = encode_request_json(samples, clock, ns)?;
    if json.len() > config.max_payload_size {
        return Err(SenderError::argument(format!(
            "request payload too large ({} bytes, max {})",
            json.len(),
            config.max_payload_size
        )));
    }

    let mut frame = BytesMut::new();
    encode_frame(&json, &mut frame);
    Ok(frame)
}
