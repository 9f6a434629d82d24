use std::fmt;

use serde::Serialize;

use crate::error::{Result, SenderError};

/// Largest valid nanosecond component.
pub const MAX_NS: i64 = 999_999_999;

/// One metric observation for a monitored host.
///
/// `host`, `key` and `value` are fixed at construction. The optional
/// timestamp can be adjusted through `&mut self` setters; `ns` is range
/// checked and left untouched when the new value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Sample {
    host: String,
    key: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    clock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ns: Option<u32>,
}

impl Sample {
    /// Create a sample without a timestamp.
    pub fn new(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(host, key, value).build()
    }

    /// Start building a sample with an optional timestamp.
    pub fn builder(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> SampleBuilder {
        SampleBuilder {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            clock: None,
            ns: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Unix timestamp in seconds, if set.
    pub fn clock(&self) -> Option<i64> {
        self.clock
    }

    /// Nanosecond component of the timestamp, if set.
    pub fn ns(&self) -> Option<u32> {
        self.ns
    }

    pub fn set_clock(&mut self, clock: i64) {
        self.clock = Some(clock);
    }

    pub fn clear_clock(&mut self) {
        self.clock = None;
    }

    /// Set the nanosecond component. Fails without modifying the sample when
    /// `ns` is outside `0..=999_999_999`.
    pub fn set_ns(&mut self, ns: i64) -> Result<()> {
        self.ns = Some(validate_ns(ns)?);
        Ok(())
    }

    pub fn clear_ns(&mut self) {
        self.ns = None;
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sample{{host='{}', key='{}', value='{}'",
            self.host, self.key, self.value
        )?;
        if let Some(clock) = self.clock {
            write!(f, ", clock={clock}")?;
        }
        if let Some(ns) = self.ns {
            write!(f, ", ns={ns}")?;
        }
        f.write_str("}")
    }
}

/// Builder for [`Sample`]. All fields are validated in [`SampleBuilder::build`].
#[derive(Debug, Clone)]
pub struct SampleBuilder {
    host: String,
    key: String,
    value: String,
    clock: Option<i64>,
    ns: Option<i64>,
}

impl SampleBuilder {
    pub fn clock(mut self, clock: i64) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn ns(mut self, ns: i64) -> Self {
        self.ns = Some(ns);
        self
    }

    pub fn build(self) -> Result<Sample> {
        if self.host.is_empty() {
            return Err(SenderError::argument("sample host must not be empty"));
        }
        if self.key.is_empty() {
            return Err(SenderError::argument("sample key must not be empty"));
        }
        let ns = self.ns.map(validate_ns).transpose()?;

        Ok(Sample {
            host: self.host,
            key: self.key,
            value: self.value,
            clock: self.clock,
            ns,
        })
    }
}

pub(crate) fn validate_ns(ns: i64) -> Result<u32> {
    if !(0..=MAX_NS).contains(&ns) {
        return Err(SenderError::argument(format!(
            "nanoseconds must be between 0 and 999,999,999 (got {ns})"
        )));
    }
    Ok(ns as u32)
}
