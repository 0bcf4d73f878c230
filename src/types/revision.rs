//! Logical datastore revisions.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, ParseBigDecimalError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A totally ordered logical timestamp of a datastore's write state.
///
/// Revisions are arbitrary-precision decimals so that backends can use
/// whatever counter suits them (nanosecond timestamps, hybrid logical clocks
/// rendered as `wall.logical`, transaction ids). Comparison and equality are
/// numeric: `Revision::from_str("1.50")` equals `Revision::from_str("1.5")`.
///
/// Clients never see a revision directly; it travels inside a
/// [`ConsistencyToken`](crate::types::ConsistencyToken).
///
/// ```rust
/// use inferadb_tuple::types::Revision;
///
/// let a: Revision = "1700000000000000000".parse().unwrap();
/// let b = Revision::from(1_700_000_000_000_000_001_i64);
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Revision(BigDecimal);

impl Revision {
    /// Wraps a decimal value.
    pub fn new(value: BigDecimal) -> Self {
        Self(value)
    }

    /// The zero revision.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns the underlying decimal.
    #[inline]
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Consumes the revision and returns the underlying decimal.
    #[inline]
    pub fn into_decimal(self) -> BigDecimal {
        self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Revision {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(s).map(Self)
    }
}

impl From<BigDecimal> for Revision {
    fn from(value: BigDecimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Revision {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl From<u64> for Revision {
    fn from(value: u64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl Serialize for Revision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Revision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
