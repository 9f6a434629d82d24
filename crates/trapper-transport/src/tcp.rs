use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::target::Target;
use crate::traits::Connector;

/// Socket options applied to every connection.
///
/// All timeouts default to `None` (block indefinitely).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Deadline for establishing the TCP connection, per resolved address.
    pub connect_timeout: Option<Duration>,
    /// Read timeout on the connected socket.
    pub read_timeout: Option<Duration>,
    /// Write timeout on the connected socket.
    pub write_timeout: Option<Duration>,
}

impl ConnectOptions {
    /// Apply the same deadline to connect, read and write.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            connect_timeout: Some(timeout),
            read_timeout: Some(timeout),
            write_timeout: Some(timeout),
        }
    }
}

/// Production [`Connector`]: plain TCP, one connection per call.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    options: ConnectOptions,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConnectOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    fn resolve(&self, target: &Target) -> Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (target.host(), target.port())
            .to_socket_addrs()
            .map_err(|source| TransportError::Resolve {
                target: target.clone(),
                source,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(TransportError::Resolve {
                target: target.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no addresses found for {}", target.host()),
                ),
            });
        }
        Ok(addrs)
    }

    fn connect_addr(&self, addr: &SocketAddr) -> std::io::Result<TcpStream> {
        match self.options.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        }
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, target: &Target) -> Result<TcpStream> {
        let addrs = self.resolve(target)?;

        let mut last_err = None;
        for addr in &addrs {
            match self.connect_addr(addr) {
                Ok(stream) => {
                    stream.set_read_timeout(self.options.read_timeout)?;
                    stream.set_write_timeout(self.options.write_timeout)?;
                    stream.set_nodelay(true)?;
                    debug!(collector = %target, %addr, "connected to collector");
                    return Ok(stream);
                }
                Err(err) => {
                    debug!(collector = %target, %addr, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(TransportError::Connect {
            target: target.clone(),
            source: last_err.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no address to connect to")
            }),
        })
    }
}
