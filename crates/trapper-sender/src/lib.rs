//! Metric sample submission over the trapper protocol.
//!
//! Build [`Sample`]s, hand a batch to a [`SenderClient`] and get back either
//! the collector's acknowledgement or a [`SenderError`] saying which layer
//! failed: caller input, the socket, the envelope, or the collector itself.
//!
//! ```no_run
//! use trapper_sender::{Sample, SenderClient};
//! use trapper_transport::Target;
//!
//! let client = SenderClient::new(Target::with_default_port("zabbix.example.net")?);
//! let sample = Sample::new("web01", "app.requests", "42")?;
//! let ack = client.send_one(&sample)?;
//! println!("{}", ack.info.unwrap_or_default());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod sample;

pub use client::{SenderClient, SenderConfig};
pub use error::{ErrorKind, ProtocolError, Result, SenderError};
pub use request::{encode_request, encode_request_json, BatchClock, SENDER_DATA};
pub use response::{read_response, validate_response, SenderInfo, SenderResponse, NO_INFO};
pub use sample::{Sample, SampleBuilder, MAX_NS};
