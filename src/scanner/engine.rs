//! Scan engine: runs probes over a port set under one [`ScanPolicy`].
//!
//! An engine is built for one scan and consumed by [`ScanEngine::run`], so
//! it goes `Idle -> Running -> Completed` exactly once and cannot be reused.

use crate::scanner::interrupt::Interrupt;
use crate::scanner::policy::ScanPolicy;
use crate::scanner::sink::ResultSink;
use crate::scanner::traits::Scanner;
use crate::types::{Port, PortSet};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

/// What a finished scan hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Ports that accepted a connection, ascending.
    pub open_ports: BTreeSet<Port>,
    /// Number of probes that ran to completion.
    pub ports_scanned: usize,
    /// Wall time of the whole dispatch, including any trailing pace delay.
    pub elapsed: Duration,
    /// Whether the scan was cut short by an interrupt.
    pub interrupted: bool,
}

impl ScanOutcome {
    pub fn open_count(&self) -> usize {
        self.open_ports.len()
    }
}

/// State shared by every probe of one run.
struct RunState {
    sink: ResultSink,
    scanned: AtomicUsize,
    discoveries: Option<mpsc::UnboundedSender<Port>>,
}

impl RunState {
    async fn probe(&self, scanner: &dyn Scanner, port: Port) {
        let result = scanner.probe(port, &self.sink).await;
        self.scanned.fetch_add(1, Ordering::Relaxed);

        if result.open {
            debug!(port = port.as_u16(), "port open");
            if let Some(tx) = &self.discoveries {
                // Nobody listening is fine; the port is already in the sink.
                let _ = tx.send(port);
            }
        } else {
            trace!(port = port.as_u16(), "port closed");
        }
    }
}

/// A single-use scan of one target.
pub struct ScanEngine {
    scanner: Arc<dyn Scanner>,
    ports: PortSet,
    policy: ScanPolicy,
    interrupt: Interrupt,
    discoveries: Option<mpsc::UnboundedSender<Port>>,
}

impl ScanEngine {
    /// Create an engine that probes `ports` with `scanner` under `policy`.
    pub fn new(scanner: Arc<dyn Scanner>, ports: PortSet, policy: ScanPolicy) -> Self {
        Self {
            scanner,
            ports,
            policy,
            interrupt: Interrupt::never(),
            discoveries: None,
        }
    }

    /// Stop dispatching when `interrupt` fires.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Send each open port to `tx` as soon as it is found.
    ///
    /// Under the parallel policy the order of these notifications is
    /// unspecified.
    pub fn with_discoveries(mut self, tx: mpsc::UnboundedSender<Port>) -> Self {
        self.discoveries = Some(tx);
        self
    }

    pub fn policy(&self) -> ScanPolicy {
        self.policy
    }

    pub fn ports(&self) -> &PortSet {
        &self.ports
    }

    /// Run the scan to completion or until interrupted.
    pub async fn run(self) -> ScanOutcome {
        let Self {
            scanner,
            ports,
            policy,
            mut interrupt,
            discoveries,
        } = self;

        let state = Arc::new(RunState {
            sink: ResultSink::new(),
            scanned: AtomicUsize::new(0),
            discoveries,
        });

        info!(
            addr = %scanner.target(),
            ports = ports.len(),
            %policy,
            timeout_ms = scanner.timeout().as_millis() as u64,
            "scan started"
        );
        let start = Instant::now();

        if !ports.is_empty() {
            match policy {
                ScanPolicy::Sequential => {
                    run_sequential(scanner.as_ref(), &ports, &state, &mut interrupt).await;
                }
                ScanPolicy::Paced { delay } => {
                    run_sequential(scanner.as_ref(), &ports, &state, &mut interrupt).await;
                    if !interrupt.is_triggered() {
                        debug!(delay_ms = delay.as_millis() as u64, "pass complete, pausing");
                        tokio::select! {
                            biased;
                            _ = interrupt.triggered() => {}
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }
                ScanPolicy::Parallel { workers } => {
                    run_parallel(&scanner, &ports, workers, &state, &interrupt).await;
                }
            }
        }

        let elapsed = start.elapsed();
        let interrupted = interrupt.is_triggered();
        let ports_scanned = state.scanned.load(Ordering::Relaxed);
        let open_ports = state.sink.snapshot();

        if interrupted {
            warn!(
                scanned = ports_scanned,
                total = ports.len(),
                open = open_ports.len(),
                "scan interrupted"
            );
        } else {
            info!(
                scanned = ports_scanned,
                open = open_ports.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "scan completed"
            );
        }

        ScanOutcome {
            open_ports,
            ports_scanned,
            elapsed,
            interrupted,
        }
    }
}

/// Probe every port in order, one at a time.
async fn run_sequential(
    scanner: &dyn Scanner,
    ports: &PortSet,
    state: &RunState,
    interrupt: &mut Interrupt,
) {
    for port in ports.iter() {
        if interrupt.is_triggered() {
            break;
        }
        tokio::select! {
            biased;
            _ = interrupt.triggered() => break,
            _ = state.probe(scanner, port) => {}
        }
    }
}

/// Seed one queue with every port and let a fixed pool of workers drain it.
///
/// Returns once every worker has seen the queue empty (or the interrupt).
async fn run_parallel(
    scanner: &Arc<dyn Scanner>,
    ports: &PortSet,
    workers: NonZeroUsize,
    state: &Arc<RunState>,
    interrupt: &Interrupt,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    for port in ports.iter() {
        // The receiver is alive until the workers finish.
        let _ = tx.send(port);
    }
    // Closing the queue lets workers exit on empty instead of waiting.
    drop(tx);

    let queue = Arc::new(Mutex::new(rx));
    let pool = workers.get().min(ports.len());
    debug!(workers = pool, "starting worker pool");

    let handles: Vec<_> = (0..pool)
        .map(|id| {
            tokio::spawn(worker(
                id,
                Arc::clone(scanner),
                Arc::clone(&queue),
                Arc::clone(state),
                interrupt.clone(),
            ))
        })
        .collect();

    for joined in futures::future::join_all(handles).await {
        if let Err(e) = joined {
            warn!(error = %e, "scan worker failed");
        }
    }
}

async fn worker(
    id: usize,
    scanner: Arc<dyn Scanner>,
    queue: Arc<Mutex<mpsc::UnboundedReceiver<Port>>>,
    state: Arc<RunState>,
    mut interrupt: Interrupt,
) {
    loop {
        if interrupt.is_triggered() {
            break;
        }
        let next = queue.lock().await.recv().await;
        let Some(port) = next else {
            break;
        };
        tokio::select! {
            biased;
            _ = interrupt.triggered() => break,
            _ = state.probe(scanner.as_ref(), port) => {}
        }
    }
    trace!(worker = id, "worker finished");
}
