use serde_json::Value;
use tracing::{debug, info, warn};
use trapper_frame::{FrameConfig, FrameWriter};
use trapper_transport::{ConnectOptions, Connector, Target, TcpConnector};

use crate::error::{Result, SenderError};
use crate::request::{encode_request, BatchClock};
use crate::response::{read_response, validate_response, SenderResponse};
use crate::sample::Sample;

/// Configuration for a [`SenderClient`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderConfig {
    /// Payload caps for request and reply frames.
    pub frame: FrameConfig,
    /// Socket timeouts. All `None` (blocking) by default.
    pub connect: ConnectOptions,
}

/// Submits sample batches to one collector.
///
/// Every send opens a fresh connection, writes one frame, reads one reply
/// frame and closes the connection, whatever the outcome. The client holds no
/// per-call state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct SenderClient<C = TcpConnector> {
    target: Target,
    config: SenderConfig,
    connector: C,
}

impl SenderClient<TcpConnector> {
    /// Create a client with default configuration.
    pub fn new(target: Target) -> Self {
        Self::with_config(target, SenderConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(target: Target, config: SenderConfig) -> Self {
        let connector = TcpConnector::with_options(config.connect.clone());
        Self::with_connector(target, config, connector)
    }
}

impl<C: Connector> SenderClient<C> {
    /// Create a client using a custom connector.
    pub fn with_connector(target: Target, config: SenderConfig, connector: C) -> Self {
        Self {
            target,
            config,
            connector,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Send a single sample.
    pub fn send_one(&self, sample: &Sample) -> Result<SenderResponse> {
        self.send_batch(std::slice::from_ref(sample), None, None)
    }

    /// Send a batch without a batch-level timestamp.
    pub fn send(&self, samples: &[Sample]) -> Result<SenderResponse> {
        self.send_batch(samples, None, None)
    }

    /// Send a batch stamped with a batch-level timestamp.
    pub fn send_with_clock(&self, samples: &[Sample], clock: BatchClock) -> Result<SenderResponse> {
        self.send_batch(samples, Some(clock.clock), clock.ns)
    }

    /// Send a batch with optional batch-level `clock` and `ns`.
    ///
    /// The batch is validated and encoded before connecting; an invalid batch
    /// never opens a socket.
    pub fn send_batch(
        &self,
        samples: &[Sample],
        clock: Option<i64>,
        ns: Option<i64>,
    ) -> Result<SenderResponse> {
        let frame = encode_request(samples, clock, ns, &self.config.frame)?;
        debug!(
            collector = %self.target,
            samples = samples.len(),
            bytes = frame.len(),
            "sending sample batch"
        );

        let body = self.exchange(&frame)?;

        match validate_response(body) {
            Ok(response) => {
                info!(
                    collector = %self.target,
                    info = response.info.as_deref().unwrap_or(""),
                    "collector accepted batch"
                );
                Ok(response)
            }
            Err(SenderError::Application { info, body }) => {
                warn!(collector = %self.target, %info, "collector rejected batch");
                Err(SenderError::Application { info, body })
            }
            Err(err) => Err(err),
        }
    }

    /// Write one encoded frame over a fresh connection and read the decoded
    /// reply body. The connection is dropped on return.
    fn exchange(&self, frame: &[u8]) -> Result<Value> {
        let mut stream = self.connector.connect(&self.target)?;

        FrameWriter::with_config(&mut stream, self.config.frame.clone()).send_encoded(frame)?;
        read_response(&mut stream, &self.config.frame)
    }
}
