//! quickscan - a TCP connect port scanner.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use quickscan::cli::Args;
use quickscan::output::{self, OutputFormat, ScanReport};
use quickscan::scanner::{Interrupt, ScanEngine, TcpConnectScanner};
use quickscan::types::ScanTarget;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "quickscan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    // Everything that can reject the request happens before the first probe.
    let settings = args.settings().context("loading settings")?;
    let plan = args.plan(&settings)?;
    let ports = plan
        .port_spec
        .resolve()
        .map_err(quickscan::ScanError::from)?;
    let target = ScanTarget::resolve(&args.target)
        .await
        .map_err(quickscan::ScanError::from)?;

    let plain = plan.output == OutputFormat::Plain;
    let live = plain && plan.verbose;
    let started_at = Local::now();
    if plain {
        output::print_scan_header(&target, plan.policy, ports.len(), started_at);
    }

    let (interrupt_handle, interrupt) = Interrupt::channel();
    let ctrl_c = interrupt_handle.trigger_on_ctrl_c();

    let ports_total = ports.len();
    let scanner = Arc::new(TcpConnectScanner::new(target.ip, plan.timeout));
    let mut engine = ScanEngine::new(scanner, ports, plan.policy).with_interrupt(interrupt);

    let printer = if live {
        let (tx, mut rx) = mpsc::unbounded_channel();
        engine = engine.with_discoveries(tx);
        Some(tokio::spawn(async move {
            while let Some(port) = rx.recv().await {
                output::print_open_port(port);
            }
        }))
    } else {
        None
    };

    let outcome = engine.run().await;
    ctrl_c.abort();
    if let Some(printer) = printer {
        printer.await.context("open port printer")?;
    }

    if outcome.interrupted && plain {
        output::print_warning("interrupted, reporting partial results");
    }

    let report = ScanReport::new(&target, plan.policy, ports_total, &outcome, started_at);
    output::print_results(&report, plan.output, !live)?;

    Ok(())
}
