//! Scanner module - probes, result collection and the scan engine.
//!
//! The engine drives a [`Scanner`] (normally [`TcpConnectScanner`]) over a
//! resolved port set using tokio tasks, collecting open ports in a
//! [`ResultSink`].

pub mod engine;
pub mod interrupt;
pub mod policy;
pub mod sink;
pub mod tcp;
pub mod traits;

pub use engine::{ScanEngine, ScanOutcome};
pub use interrupt::{Interrupt, InterruptHandle};
pub use policy::{ScanPolicy, DEFAULT_PACE_DELAY, DEFAULT_WORKERS};
pub use sink::ResultSink;
pub use tcp::TcpConnectScanner;
pub use traits::{ProbeResult, Scanner, DEFAULT_TIMEOUT};
