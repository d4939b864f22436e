//! # quickscan - A TCP Connect Port Scanner
//!
//! quickscan finds the ports on a host that accept a TCP connection within
//! a bounded timeout. Ports can be probed one at a time, one at a time with
//! a trailing pause, or by a fixed pool of concurrent workers.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use quickscan::scanner::{ScanEngine, ScanPolicy, TcpConnectScanner};
//! use quickscan::types::PortSpec;
//! use std::net::IpAddr;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let target: IpAddr = "192.168.1.1".parse()?;
//!     let ports = PortSpec::List("22,80,443,8000-8100".into()).resolve()?;
//!     let scanner = Arc::new(TcpConnectScanner::new(target, Duration::from_secs(1)));
//!
//!     let outcome = ScanEngine::new(scanner, ports, ScanPolicy::parallel(50)?)
//!         .run()
//!         .await;
//!
//!     for port in &outcome.open_ports {
//!         println!("{} is open", port);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port specifications and scan targets
//! - [`scanner`] - The connect probe, result sink, policies and scan engine
//! - [`config`] - Persisted scan defaults
//! - [`cli`] - Command-line arguments and request validation
//! - [`error`] - Error types
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{ScanError, ScanResult};
pub use scanner::{ScanEngine, ScanOutcome, ScanPolicy, Scanner};
pub use types::{Port, PortSet, PortSpec, ScanTarget};
