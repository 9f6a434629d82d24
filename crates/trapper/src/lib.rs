//! Submit metric samples to a monitoring collector over the trapper protocol.
//!
//! trapper frames batches of samples into the `ZBXD` envelope, sends them
//! over one TCP connection per call and classifies the collector's reply.
//!
//! # Crate Structure
//!
//! - [`transport`]: Collector targets and the one-connection-per-call TCP connector
//! - [`frame`]: `ZBXD` envelope codec with partial-read-safe reader
//! - [`sender`]: Samples, request encoding, reply validation and the client

/// Re-export transport types.
pub mod transport {
    pub use trapper_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use trapper_frame::*;
}

/// Re-export sender types.
pub mod sender {
    pub use trapper_sender::*;
}

pub use trapper_sender::{BatchClock, Sample, SenderClient, SenderConfig, SenderError};
pub use trapper_transport::Target;
