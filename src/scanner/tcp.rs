//! TCP Connect Scanner implementation.
//!
//! Performs standard TCP connect scans using the operating system's
//! socket API. It completes the full TCP handshake and closes the
//! connection straight away.

use crate::scanner::traits::{ProbeResult, Scanner};
use crate::types::Port;
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP Connect Scanner.
///
/// Uses standard socket connect() calls to determine port status.
/// Does not require elevated privileges.
///
/// The timeout wraps the whole connect future, so a host that silently
/// drops SYNs still yields a result once it elapses.
#[derive(Debug, Clone)]
pub struct TcpConnectScanner {
    target: IpAddr,
    timeout: Duration,
}

impl TcpConnectScanner {
    /// Create a new TCP connect scanner.
    ///
    /// # Arguments
    /// * `target` - Target IP address to scan
    /// * `timeout` - Connection timeout per port
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }
}

#[async_trait]
impl Scanner for TcpConnectScanner {
    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn scan_port(&self, port: Port) -> ProbeResult {
        let addr = SocketAddr::new(self.target, port.as_u16());
        let start = Instant::now();

        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                let response_time = start.elapsed().as_millis() as u64;
                drop(stream);
                ProbeResult::open(port).with_response_time(response_time)
            }
            Ok(Err(e)) => {
                trace!(%addr, error = %e, "connect failed");
                ProbeResult::closed(port)
            }
            Err(_) => {
                trace!(%addr, "connect timed out");
                ProbeResult::closed(port)
            }
        }
    }
}
