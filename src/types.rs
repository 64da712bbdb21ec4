//! Core identifier and small value types used throughout the aggregator.

use serde::{Deserialize, Serialize};

/// Unique identifier for a traffic signal
///
/// Any decodable integer is a valid identity, including zero and negatives;
/// the store performs no range validation on ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct SignalId(i64);

impl SignalId {
    #[must_use]
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying integer
    #[must_use]
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for SignalId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SignalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SignalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// Validated TCP listen port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self(port)
    }

    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Port {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>().map(Self)
    }
}
