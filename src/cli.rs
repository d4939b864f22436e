//! Command-line interface definitions for quickscan.
//!
//! Uses `clap` derive macros for declarative argument parsing. Mutually
//! exclusive selectors are checked here rather than by clap so that a
//! contradiction is reported as a [`ScanError::PolicyConflict`].

use crate::config::ScanSettings;
use crate::error::{ScanError, ScanResult};
use crate::output::OutputFormat;
use crate::scanner::ScanPolicy;
use crate::types::PortSpec;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// A TCP connect port scanner.
///
/// Without -p or -a the 1000 most common TCP ports are scanned. Without -s
/// or -f ports are probed one at a time.
#[derive(Parser, Debug)]
#[command(name = "quickscan")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A TCP connect port scanner", long_about = None)]
pub struct Args {
    /// Target IP address or hostname to scan
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g., "80", "80,443", "1-1000", "22,80,443,8000-9000")
    #[arg(short, long, value_name = "SPEC")]
    pub ports: Option<String>,

    /// Scan all ports (1-65535)
    #[arg(short = 'a', long)]
    pub all_ports: bool,

    /// Slow scan: sequential, then pause before finishing
    #[arg(short, long)]
    pub slow: bool,

    /// Fast scan: probe ports with a pool of concurrent workers
    #[arg(short, long)]
    pub fast: bool,

    /// Worker pool size for fast scans
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Connection timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Pause after a slow scan, in milliseconds
    #[arg(long, value_name = "MS")]
    pub pace_delay: Option<u64>,

    /// Print open ports as they are found
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Path to a settings file (default: the XDG config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,
}

/// A validated scan request: every selector resolved, no contradictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub port_spec: PortSpec,
    pub policy: ScanPolicy,
    pub timeout: Duration,
    pub verbose: bool,
    pub output: OutputFormat,
}

impl Args {
    /// Combine arguments with persisted settings, arguments winning.
    pub fn plan(&self, settings: &ScanSettings) -> ScanResult<ScanPlan> {
        let port_spec = PortSpec::from_selectors(self.ports.as_deref(), self.all_ports)
            .ok_or(ScanError::PolicyConflict("--ports", "--all-ports"))?;

        let pace_delay = self
            .pace_delay
            .map(Duration::from_millis)
            .unwrap_or_else(|| settings.pace_delay());
        let workers = self.workers.unwrap_or(settings.workers);
        let policy = ScanPolicy::from_selectors(self.slow, self.fast, workers, pace_delay)?;

        let timeout = self
            .timeout
            .map(Duration::from_millis)
            .unwrap_or_else(|| settings.timeout());
        if timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(ScanPlan {
            port_spec,
            policy,
            timeout,
            verbose: self.verbose || settings.verbose,
            output: self.output.unwrap_or(settings.output),
        })
    }

    /// Load the settings file named by `--config`, or the default one.
    pub fn settings(&self) -> ScanResult<ScanSettings> {
        let settings = match &self.config {
            Some(path) => ScanSettings::load_from(path)?,
            None => ScanSettings::load()?,
        };
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(argv: &[&str]) -> ScanResult<ScanPlan> {
        let args = Args::try_parse_from(std::iter::once("quickscan").chain(argv.iter().copied()))
            .unwrap();
        args.plan(&ScanSettings::default())
    }

    #[test]
    fn test_defaults() {
        let plan = plan(&["127.0.0.1"]).unwrap();
        assert_eq!(plan.port_spec, PortSpec::Top);
        assert_eq!(plan.policy, ScanPolicy::Sequential);
        assert_eq!(plan.timeout, Duration::from_secs(1));
        assert_eq!(plan.output, OutputFormat::Plain);
        assert!(!plan.verbose);
    }

    #[test]
    fn test_explicit_ports_and_fast() {
        let plan = plan(&["host", "-p", "22,80", "-f", "-w", "10"]).unwrap();
        assert_eq!(plan.port_spec, PortSpec::List("22,80".to_string()));
        assert_eq!(plan.policy, ScanPolicy::parallel(10).unwrap());
    }

    #[test]
    fn test_slow_uses_pace_delay() {
        let plan = plan(&["host", "-a", "-s", "--pace-delay", "500"]).unwrap();
        assert_eq!(plan.port_spec, PortSpec::All);
        assert_eq!(
            plan.policy,
            ScanPolicy::Paced {
                delay: Duration::from_millis(500)
            }
        );
    }

    #[test]
    fn test_slow_and_fast_conflict() {
        let err = plan(&["host", "-s", "-f"]).unwrap_err();
        assert!(matches!(err, ScanError::PolicyConflict("--slow", "--fast")));
    }

    #[test]
    fn test_ports_and_all_ports_conflict() {
        let err = plan(&["host", "-p", "80", "-a"]).unwrap_err();
        assert!(matches!(
            err,
            ScanError::PolicyConflict("--ports", "--all-ports")
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = plan(&["host", "-t", "0"]).unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn test_settings_fill_unset_flags() {
        let args = Args::try_parse_from(["quickscan", "host", "-f"]).unwrap();
        let settings = ScanSettings {
            workers: 7,
            timeout_ms: 250,
            output: OutputFormat::Json,
            ..ScanSettings::default()
        };
        let plan = args.plan(&settings).unwrap();

        assert_eq!(plan.policy, ScanPolicy::parallel(7).unwrap());
        assert_eq!(plan.timeout, Duration::from_millis(250));
        assert_eq!(plan.output, OutputFormat::Json);
    }

    #[test]
    fn test_flags_override_settings() {
        let args =
            Args::try_parse_from(["quickscan", "host", "-f", "-w", "3", "-o", "plain"]).unwrap();
        let settings = ScanSettings {
            workers: 7,
            output: OutputFormat::Json,
            ..ScanSettings::default()
        };
        let plan = args.plan(&settings).unwrap();

        assert_eq!(plan.policy, ScanPolicy::parallel(3).unwrap());
        assert_eq!(plan.output, OutputFormat::Plain);
    }
}
