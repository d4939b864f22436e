//! Scanner trait abstraction.
//!
//! Defines the probe interface the engine drives, so the real TCP connect
//! probe and simulated probes in tests are interchangeable.

use crate::scanner::sink::ResultSink;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Default per-port connect timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Result of probing a single port.
///
/// A port is either open or it is not; refused, filtered and unreachable
/// all collapse to `open == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The port number that was probed.
    pub port: Port,
    /// Whether a connection was established within the timeout.
    pub open: bool,
    /// Time to connect, for open ports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl ProbeResult {
    /// A port that accepted the connection.
    pub fn open(port: Port) -> Self {
        Self {
            port,
            open: true,
            response_time_ms: None,
        }
    }

    /// A port that did not accept the connection, for whatever reason.
    pub fn closed(port: Port) -> Self {
        Self {
            port,
            open: false,
            response_time_ms: None,
        }
    }

    /// Set the response time.
    pub fn with_response_time(mut self, time_ms: u64) -> Self {
        self.response_time_ms = Some(time_ms);
        self
    }
}

/// Trait for port probe implementations.
///
/// # Example
///
/// ```ignore
/// use quickscan::scanner::{ResultSink, Scanner};
///
/// async fn check<S: Scanner>(scanner: &S, port: Port, sink: &ResultSink) -> bool {
///     scanner.probe(port, sink).await.open
/// }
/// ```
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Probe a single port. Must never fail: any connect error is a closed port.
    async fn scan_port(&self, port: Port) -> ProbeResult;

    /// Probe a port and publish it to `sink` if open.
    ///
    /// The port is in the sink before this returns.
    async fn probe(&self, port: Port, sink: &ResultSink) -> ProbeResult {
        let result = self.scan_port(port).await;
        if result.open {
            sink.add(port);
        }
        result
    }

    /// Get the target IP address.
    fn target(&self) -> IpAddr;

    /// Get the configured timeout.
    fn timeout(&self) -> Duration;
}
