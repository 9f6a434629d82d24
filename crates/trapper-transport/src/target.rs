use std::fmt;

use crate::error::{Result, TransportError};

/// Default port of the collector's trapper listener.
pub const DEFAULT_PORT: u16 = 10051;

/// Address of a collector (server or proxy) trapper listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    /// Create a target, rejecting an empty host or port 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(TransportError::InvalidTarget(
                "host must not be empty".to_string(),
            ));
        }
        if port == 0 {
            return Err(TransportError::InvalidTarget(
                "port must be between 1 and 65535".to_string(),
            ));
        }
        Ok(Self { host, port })
    }

    /// Create a target on [`DEFAULT_PORT`].
    pub fn with_default_port(host: impl Into<String>) -> Result<Self> {
        Self::new(host, DEFAULT_PORT)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_host() {
        let err = Target::new("  ", 10051).unwrap_err();
        assert!(matches!(err, TransportError::InvalidTarget(_)));
    }

    #[test]
    fn rejects_port_zero() {
        let err = Target::new("collector", 0).unwrap_err();
        assert!(matches!(err, TransportError::InvalidTarget(_)));
    }

    #[test]
    fn default_port_is_trapper_port() {
        let target = Target::with_default_port("collector").unwrap();
        assert_eq!(target.port(), 10051);
        assert_eq!(target.host(), "collector");
    }

    #[test]
    fn display_brackets_ipv6_literals() {
        assert_eq!(
            Target::new("127.0.0.1", 10051).unwrap().to_string(),
            "127.0.0.1:10051"
        );
        assert_eq!(Target::new("::1", 10051).unwrap().to_string(), "[::1]:10051");
    }
}
