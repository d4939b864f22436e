//! Output formatting module.
//!
//! Provides formatters for plain text and JSON output of scan results.

mod json_format;
mod plain;

pub use json_format::print_json;
pub use plain::{
    format_elapsed, print_error, print_open_port, print_plain, print_scan_header, print_warning,
};

use crate::scanner::{ScanOutcome, ScanPolicy};
use crate::types::{Port, ScanTarget};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Everything the presentation layer reports about one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Target as given on the command line.
    pub target: String,
    /// Address that was actually scanned.
    pub ip_address: String,
    /// Dispatch policy used.
    pub policy: String,
    /// Number of ports in the resolved port set.
    pub ports_total: usize,
    /// Number of ports actually probed.
    pub ports_scanned: usize,
    /// Open ports, ascending.
    pub open_ports: Vec<Port>,
    /// Wall time of the scan in milliseconds.
    pub elapsed_ms: u64,
    /// Whether the scan was aborted before finishing.
    pub interrupted: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl ScanReport {
    pub fn new(
        target: &ScanTarget,
        policy: ScanPolicy,
        ports_total: usize,
        outcome: &ScanOutcome,
        started_at: DateTime<Local>,
    ) -> Self {
        Self {
            target: target.original.clone(),
            ip_address: target.ip.to_string(),
            policy: policy.to_string(),
            ports_total,
            ports_scanned: outcome.ports_scanned,
            open_ports: outcome.open_ports.iter().copied().collect(),
            elapsed_ms: outcome.elapsed.as_millis() as u64,
            interrupted: outcome.interrupted,
            started_at,
            finished_at: Local::now(),
        }
    }
}

/// Format and print scan results according to the specified format.
///
/// `list_open` controls whether plain output repeats the open ports; it is
/// off when they were already printed live.
pub fn print_results(report: &ScanReport, format: OutputFormat, list_open: bool) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report, list_open),
        OutputFormat::Json => print_json(report),
    }
}
