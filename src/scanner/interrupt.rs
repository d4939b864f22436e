//! Operator interrupt for a running scan.
//!
//! A [`InterruptHandle`] is held by whoever can abort the scan (usually a
//! Ctrl+C listener); the engine holds the matching [`Interrupt`] and stops
//! dispatching ports once it fires.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Trigger side of an interrupt.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl InterruptHandle {
    /// Ask the scan to stop. Calling this more than once has no further effect.
    pub fn trigger(&self) {
        if !self.tx.send_replace(true) {
            debug!("scan interrupt requested");
        }
    }

    /// Forward the first Ctrl+C to this handle.
    pub fn trigger_on_ctrl_c(&self) -> tokio::task::JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                handle.trigger();
            }
        })
    }
}

/// Listening side of an interrupt, checked by the engine.
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

impl Interrupt {
    /// Create a connected handle/listener pair.
    pub fn channel() -> (InterruptHandle, Interrupt) {
        let (tx, rx) = watch::channel(false);
        (InterruptHandle { tx: Arc::new(tx) }, Interrupt { rx })
    }

    /// An interrupt that can never fire.
    pub fn never() -> Self {
        let (_, interrupt) = Self::channel();
        interrupt
    }

    /// Whether the interrupt has fired.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the interrupt fires. Pends forever if every handle is
    /// dropped without firing.
    pub async fn triggered(&mut self) {
        let closed = self.rx.wait_for(|fired| *fired).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}
