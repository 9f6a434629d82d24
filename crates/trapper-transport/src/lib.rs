//! TCP transport for the trapper protocol.
//!
//! This is the lowest layer of trapper. It resolves a collector [`Target`]
//! and opens exactly one blocking TCP connection per request through the
//! [`Connector`] trait. There is no pooling and no reuse; a stream lives for
//! one request/response exchange and is closed when dropped.

pub mod error;
pub mod target;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use target::{Target, DEFAULT_PORT};
pub use tcp::{ConnectOptions, TcpConnector};
pub use traits::Connector;
