//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::ScanReport;
use crate::scanner::ScanPolicy;
use crate::types::{Port, ScanTarget};
use chrono::{DateTime, Local};
use console::style;
use std::io::{self, Write};
use std::time::Duration;

const RULE: &str = "──────────────────────────────────────────────────";
const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Print a scan header before scanning begins.
pub fn print_scan_header(
    target: &ScanTarget,
    policy: ScanPolicy,
    ports: usize,
    started_at: DateTime<Local>,
) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("quickscan").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style(RULE).dim());
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(target).white().bold()
    );
    println!("{} Policy: {}", style("•").dim(), style(policy).yellow());
    println!(
        "{} Scanning {} port(s), started at {}",
        style("•").dim(),
        style(ports).white().bold(),
        started_at.format(TIMESTAMP)
    );
    println!("{}", style(RULE).dim());
}

/// Announce an open port as soon as it is found.
pub fn print_open_port(port: Port) {
    println!("{} is {}", port, style("open").green().bold());
}

/// Print results in human-readable plain text format.
pub fn print_plain(report: &ScanReport, list_open: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();

    if list_open {
        for port in &report.open_ports {
            writeln!(out, "{} is {}", port, style("open").green().bold())?;
        }
    }

    writeln!(out, "{}", style(RULE).dim())?;
    if report.interrupted {
        writeln!(
            out,
            "{} scan interrupted after {} of {} port(s)",
            style("!").yellow().bold(),
            report.ports_scanned,
            report.ports_total
        )?;
    }
    writeln!(out, "Scanned {} port(s)", report.ports_scanned)?;
    writeln!(
        out,
        "{} port(s) open",
        style(report.open_ports.len()).green().bold()
    )?;
    writeln!(
        out,
        "Time elapsed: {}",
        format_elapsed(Duration::from_millis(report.elapsed_ms))
    )?;
    writeln!(
        out,
        "Scanning finished at: {}",
        report.finished_at.format(TIMESTAMP)
    )?;
    writeln!(out, "{}", style(RULE).dim())?;

    Ok(())
}

/// Format a duration as `H:M:S` with whole seconds.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{}:{}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
