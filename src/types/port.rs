//! Port types with validation and parsing.
//!
//! The `Port` newtype ensures values are always valid port numbers (1-65535).
//! `PortSpec` describes which ports a scan should cover and `PortSet` is the
//! resolved, deduplicated collection the engine actually iterates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// A validated network port number (1-65535).
///
/// Using a newtype prevents accidental misuse of raw u16 values
/// and ensures port numbers are always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    /// Minimum valid port number.
    pub const MIN: u16 = 1;
    /// Maximum valid port number.
    pub const MAX: u16 = 65535;

    /// Create a new Port from a u16, returning None if invalid.
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        if port >= Self::MIN {
            Some(Self(port))
        } else {
            None
        }
    }

    /// Get the raw port number.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Parse a single port token, distinguishing garbage from out-of-range numbers.
    fn parse_token(token: &str) -> Result<Self, PortError> {
        let token = token.trim();
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PortError::InvalidFormat(token.to_string()));
        }

        // Digits only, so the only way this fails is overflow.
        let value: u64 = token
            .parse()
            .map_err(|_| PortError::OutOfRange(token.to_string()))?;

        u16::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| PortError::OutOfRange(token.to_string()))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| PortError::OutOfRange(value.to_string()))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

/// Error type for port parsing and validation.
///
/// Every variant means the port specification is unusable and the scan
/// must not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(String),
    #[error("invalid port token: '{0}'")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
}

/// A range of ports (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: Port,
    end: Port,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: Port, end: Port) -> Result<Self, PortError> {
        if start > end {
            Err(PortError::InvalidRange(start.0, end.0))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: Port) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// The whole port space, 1-65535.
    pub const fn full() -> Self {
        Self {
            start: Port(Port::MIN),
            end: Port(Port::MAX),
        }
    }

    /// Get the number of ports in this range.
    pub const fn len(&self) -> usize {
        (self.end.0 - self.start.0) as usize + 1
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = Port> {
        (self.start.0..=self.end.0).map(Port)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.split_once('-') {
            Some((start, end)) => {
                if end.contains('-') {
                    return Err(PortError::InvalidFormat(token.to_string()));
                }
                let start = Port::parse_token(start).map_err(|e| widen(e, token))?;
                let end = Port::parse_token(end).map_err(|e| widen(e, token))?;
                Self::new(start, end)
            }
            None => Port::parse_token(token).map(Self::single),
        }
    }
}

/// Report a malformed range bound against the whole token, so "-5" reads as
/// a bad range rather than an empty port number.
fn widen(err: PortError, token: &str) -> PortError {
    match err {
        PortError::InvalidFormat(_) => PortError::InvalidFormat(token.to_string()),
        other => other,
    }
}

/// The bundled default port list: the 1000 most commonly open TCP ports.
const TOP_PORTS_DATA: &str = include_str!("../../data/top-1000-tcp.txt");

static TOP_PORTS: LazyLock<Vec<Port>> = LazyLock::new(|| {
    TOP_PORTS_DATA
        .split(',')
        .filter_map(|token| Port::parse_token(token).ok())
        .collect()
});

/// An unresolved description of which ports to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PortSpec {
    /// An explicit comma-separated list of ports and inclusive ranges,
    /// e.g. "22,80,443,8000-8100".
    List(String),
    /// Every port, 1-65535.
    All,
    /// The bundled list of commonly used ports.
    #[default]
    Top,
}

impl PortSpec {
    /// Build a spec from the two mutually exclusive port selectors.
    ///
    /// Returns `None` when both are given; the caller decides how to
    /// report the conflict.
    pub fn from_selectors(list: Option<&str>, all: bool) -> Option<Self> {
        match (list, all) {
            (Some(_), true) => None,
            (Some(list), false) => Some(Self::List(list.to_string())),
            (None, true) => Some(Self::All),
            (None, false) => Some(Self::Top),
        }
    }

    /// Expand this spec into a deduplicated port set.
    pub fn resolve(&self) -> Result<PortSet, PortError> {
        match self {
            Self::List(list) => {
                let mut ports = BTreeSet::new();
                for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let range: PortRange = token.parse()?;
                    ports.extend(range.iter());
                }
                Ok(PortSet::from_iter(ports))
            }
            Self::All => Ok(PortSet::from_iter(PortRange::full().iter())),
            Self::Top => Ok(PortSet::from_iter(TOP_PORTS.iter().copied())),
        }
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(list) => write!(f, "{}", list),
            Self::All => write!(f, "all ports"),
            Self::Top => write!(f, "top {} ports", TOP_PORTS.len()),
        }
    }
}

/// The resolved, deduplicated set of ports a scan iterates, in ascending order.
///
/// Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSet {
    ports: Vec<Port>,
}

impl PortSet {
    /// Number of distinct ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Whether there is nothing to scan.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterate in ascending port order.
    pub fn iter(&self) -> impl Iterator<Item = Port> + '_ {
        self.ports.iter().copied()
    }

    /// Check membership.
    pub fn contains(&self, port: Port) -> bool {
        self.ports.binary_search(&port).is_ok()
    }

    /// Borrow the ports as a sorted slice.
    pub fn as_slice(&self) -> &[Port] {
        &self.ports
    }
}

impl FromIterator<Port> for PortSet {
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        let mut ports: Vec<Port> = iter.into_iter().collect();
        ports.sort_unstable();
        ports.dedup();
        Self { ports }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(list: &str) -> Result<Vec<u16>, PortError> {
        PortSpec::List(list.to_string())
            .resolve()
            .map(|set| set.iter().map(Port::as_u16).collect())
    }

    #[test]
    fn test_port_validation() {
        assert!(Port::new(0).is_none());
        assert!(Port::new(1).is_some());
        assert!(Port::new(80).is_some());
        assert!(Port::new(65535).is_some());
    }

    #[test]
    fn test_port_range() {
        let range = PortRange::new(Port::new(1).unwrap(), Port::new(100).unwrap()).unwrap();
        assert_eq!(range.len(), 100);
        assert_eq!(PortRange::full().len(), 65535);
    }

    #[test]
    fn test_resolve_explicit_list() {
        assert_eq!(resolve("22,80,443").unwrap(), vec![22, 80, 443]);
    }

    #[test]
    fn test_resolve_range() {
        assert_eq!(resolve("20-22").unwrap(), vec![20, 21, 22]);
    }

    #[test]
    fn test_resolve_overlap_collapses() {
        assert_eq!(resolve("20-22,22,90").unwrap(), vec![20, 21, 22, 90]);
        assert_eq!(resolve("80,80,443,80").unwrap(), vec![80, 443]);
        assert_eq!(resolve("1-10,5-15").unwrap().len(), 15);
    }

    #[test]
    fn test_resolve_single_port_range() {
        assert_eq!(resolve("8080-8080").unwrap(), vec![8080]);
    }

    #[test]
    fn test_resolve_ignores_whitespace_and_empty_tokens() {
        assert_eq!(resolve(" 22 , 80 ,,").unwrap(), vec![22, 80]);
    }

    #[test]
    fn test_resolve_empty_spec() {
        assert!(resolve("").unwrap().is_empty());
        assert!(resolve(",").unwrap().is_empty());
    }

    #[test]
    fn test_resolve_rejects_zero() {
        assert_eq!(resolve("0-10"), Err(PortError::OutOfRange("0".to_string())));
        assert_eq!(resolve("0"), Err(PortError::OutOfRange("0".to_string())));
    }

    #[test]
    fn test_resolve_rejects_too_large() {
        assert!(matches!(resolve("65536"), Err(PortError::OutOfRange(_))));
        assert!(matches!(resolve("1-70000"), Err(PortError::OutOfRange(_))));
        assert!(matches!(
            resolve("99999999999999999999999"),
            Err(PortError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_malformed() {
        assert!(matches!(resolve("abc"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(resolve("-5"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(resolve("1-2-3"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(resolve("10-"), Err(PortError::InvalidFormat(_))));
        assert!(matches!(resolve("+80"), Err(PortError::InvalidFormat(_))));
    }

    #[test]
    fn test_resolve_rejects_reversed_range() {
        assert_eq!(resolve("100-50"), Err(PortError::InvalidRange(100, 50)));
    }

    #[test]
    fn test_resolve_all_ports() {
        let set = PortSpec::All.resolve().unwrap();
        assert_eq!(set.len(), 65535);
        assert_eq!(set.as_slice().first().map(|p| p.as_u16()), Some(1));
        assert_eq!(set.as_slice().last().map(|p| p.as_u16()), Some(65535));
    }

    #[test]
    fn test_resolve_top_ports() {
        let set = PortSpec::Top.resolve().unwrap();
        assert_eq!(set.len(), 1000);
        for common in [21, 22, 80, 443, 3306, 8080] {
            assert!(set.contains(Port::new(common).unwrap()));
        }
    }

    #[test]
    fn test_from_selectors() {
        assert_eq!(PortSpec::from_selectors(None, false), Some(PortSpec::Top));
        assert_eq!(PortSpec::from_selectors(None, true), Some(PortSpec::All));
        assert_eq!(
            PortSpec::from_selectors(Some("80"), false),
            Some(PortSpec::List("80".to_string()))
        );
        assert_eq!(PortSpec::from_selectors(Some("80"), true), None);
    }

    #[test]
    fn test_port_serde_rejects_zero() {
        assert!(serde_json::from_str::<Port>("0").is_err());
        assert_eq!(serde_json::from_str::<Port>("22").unwrap().as_u16(), 22);
    }
}
