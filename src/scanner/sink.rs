//! Shared collector for open ports found during a scan.

use crate::types::Port;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A set of discovered open ports, safe to write from many probes at once.
///
/// Membership is all that matters: adding a port twice leaves one entry,
/// and discovery order is not kept. One sink belongs to one scan run.
#[derive(Debug, Default)]
pub struct ResultSink {
    ports: Mutex<BTreeSet<Port>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an open port. Returns `true` if it was not already present.
    pub fn add(&self, port: Port) -> bool {
        self.lock().insert(port)
    }

    pub fn contains(&self, port: Port) -> bool {
        self.lock().contains(&port)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current membership, in ascending port order.
    pub fn snapshot(&self) -> BTreeSet<Port> {
        self.lock().clone()
    }

    /// Consume the sink and take its contents.
    pub fn into_ports(self) -> BTreeSet<Port> {
        self.ports.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // Inserts cannot leave the set half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, BTreeSet<Port>> {
        self.ports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn port(n: u16) -> Port {
        Port::new(n).unwrap()
    }

    #[test]
    fn test_add_is_idempotent() {
        let sink = ResultSink::new();
        assert!(sink.add(port(80)));
        assert!(!sink.add(port(80)));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let sink = ResultSink::new();
        for n in [443, 22, 80] {
            sink.add(port(n));
        }
        let ports: Vec<u16> = sink.snapshot().into_iter().map(Port::as_u16).collect();
        assert_eq!(ports, vec![22, 80, 443]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_insert_of_same_port() {
        let sink = Arc::new(ResultSink::new());
        let mut handles = Vec::new();
        for _ in 0..32 {
            let sink = Arc::clone(&sink);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    sink.add(port(8080));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(sink.len(), 1);
        assert!(sink.contains(port(8080)));
    }

    #[test]
    fn test_concurrent_insert_loses_nothing() {
        let sink = Arc::new(ResultSink::new());
        let threads: Vec<_> = (0..8u16)
            .map(|t| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for n in 1..=500u16 {
                        sink.add(port(t * 500 + n));
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        let sink = Arc::try_unwrap(sink).unwrap();
        assert_eq!(sink.into_ports().len(), 4000);
    }
}
