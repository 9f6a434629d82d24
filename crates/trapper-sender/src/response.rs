use std::io::Read;

use serde::Serialize;
use serde_json::Value;
use trapper_frame::{FrameConfig, FrameReader};

use crate::error::{ProtocolError, Result, SenderError};

/// `info` used when a rejection carries none.
pub const NO_INFO: &str = "No additional info.";

/// An acknowledged submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderResponse {
    /// The `response` field as sent by the collector.
    pub response: String,
    /// The collector's free-text `info`, verbatim.
    pub info: Option<String>,
    /// The full decoded reply.
    pub body: Value,
}

impl SenderResponse {
    /// Parse the conventional counters out of `info`, if present.
    pub fn summary(&self) -> Option<SenderInfo> {
        self.info.as_deref().and_then(SenderInfo::parse)
    }
}

/// Read one reply frame from `stream` and parse its payload as JSON.
///
/// Only the envelope and JSON syntax are checked here; see
/// [`validate_response`] for the document itself.
pub fn read_response<R: Read>(stream: R, config: &FrameConfig) -> Result<Value> {
    let mut reader = FrameReader::with_config(stream, config.clone());
    let frame = reader.read_frame()?;

    serde_json::from_slice(&frame.payload)
        .map_err(|err| SenderError::Protocol(ProtocolError::MalformedBody(err)))
}

/// Classify a decoded reply.
///
/// `response` is compared to `success` case-insensitively. Anything else is
/// an application error carrying `info` untouched.
pub fn validate_response(body: Value) -> Result<SenderResponse> {
    let response = match body.get("response") {
        Some(value) => field_text(value),
        None => return Err(ProtocolError::MissingResponse { body }.into()),
    };
    let info = body.get("info").map(field_text);

    if response.eq_ignore_ascii_case("success") {
        return Ok(SenderResponse {
            response,
            info,
            body,
        });
    }

    Err(SenderError::Application {
        info: info.unwrap_or_else(|| NO_INFO.to_string()),
        body,
    })
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Counters from an info string such as
/// `processed: 1; failed: 0; total: 1; seconds spent: 0.000035`.
///
/// This is a convenience for callers; the validator never interprets `info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SenderInfo {
    pub processed: Option<u64>,
    pub failed: Option<u64>,
    pub total: Option<u64>,
    pub seconds_spent: Option<f64>,
}

impl SenderInfo {
    /// Parse an info string. Unknown fields are ignored; returns `None` when
    /// no known field is present.
    pub fn parse(info: &str) -> Option<Self> {
        let mut parsed = SenderInfo::default();
        let mut matched = false;

        for part in info.split(';') {
            let Some((name, value)) = part.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match name.trim() {
                "processed" => parsed.processed = value.parse().ok(),
                "failed" => parsed.failed = value.parse().ok(),
                "total" => parsed.total = value.parse().ok(),
                "seconds spent" => parsed.seconds_spent = value.parse().ok(),
                _ => continue,
            }
            matched = true;
        }

        matched.then_some(parsed)
    }
}
