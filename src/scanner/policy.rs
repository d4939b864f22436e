//! Scan execution policies.

use crate::error::{ScanError, ScanResult};
use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Default worker pool size for parallel scans.
pub const DEFAULT_WORKERS: usize = 50;

/// Default pause after a paced scan's full pass.
pub const DEFAULT_PACE_DELAY: Duration = Duration::from_secs(2);

/// How the engine dispatches probes. Exactly one applies to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    /// One port at a time, in order, no delay.
    Sequential,
    /// Like `Sequential`, followed by a single `delay` once every port has
    /// been probed. The delay is not applied between ports.
    Paced { delay: Duration },
    /// A fixed pool of workers draining a shared queue of ports.
    Parallel { workers: NonZeroUsize },
}

impl ScanPolicy {
    /// Parallel policy with the given pool size.
    pub fn parallel(workers: usize) -> ScanResult<Self> {
        NonZeroUsize::new(workers)
            .map(|workers| Self::Parallel { workers })
            .ok_or_else(|| ScanError::InvalidConfig("worker count must be at least 1".to_string()))
    }

    /// Build the policy from the slow/fast selectors.
    ///
    /// Neither selected means a plain sequential scan. Both selected is a
    /// conflict and no policy is produced.
    pub fn from_selectors(
        slow: bool,
        fast: bool,
        workers: usize,
        pace_delay: Duration,
    ) -> ScanResult<Self> {
        match (slow, fast) {
            (true, true) => Err(ScanError::PolicyConflict("--slow", "--fast")),
            (true, false) => Ok(Self::Paced { delay: pace_delay }),
            (false, true) => Self::parallel(workers),
            (false, false) => Ok(Self::Sequential),
        }
    }
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::Sequential
    }
}

impl fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Paced { delay } => write!(f, "paced ({:.1}s trailing delay)", delay.as_secs_f64()),
            Self::Parallel { workers } => write!(f, "parallel ({} workers)", workers),
        }
    }
}
