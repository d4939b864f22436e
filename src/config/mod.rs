//! Configuration management for quickscan.
//!
//! Provides XDG-compliant storage of scan defaults.

mod settings;

pub use settings::{Paths, ScanSettings};
