//! JSON output formatting.

use super::ScanReport;
use std::io::{self, Write};

/// Print the report as pretty JSON on stdout.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", json)
}
