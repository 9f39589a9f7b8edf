//! Block height and consensus round.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block height. Heights below [`Height::PRE_GENESIS`] are sentinels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Height(i64);

impl Height {
    /// "No height at all", used by callers that have not synced anything.
    pub const NIL: Self = Self(-2);
    /// The sentinel minimum; no fact is valid at or below it.
    pub const PRE_GENESIS: Self = Self(-1);
    pub const GENESIS: Self = Self(0);

    pub const fn new(h: i64) -> Self {
        Self(h)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The next height, or `None` at `i64::MAX`.
    pub fn checked_next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// The previous height, saturating at the pre-genesis sentinel.
    pub fn prev(&self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::PRE_GENESIS.0))
    }

    pub fn is_valid(&self) -> bool {
        *self >= Self::PRE_GENESIS
    }

    pub fn bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Height {
    fn from(h: i64) -> Self {
        Self(h)
    }
}

/// Attempt number within a height; round 0 is the first.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Round(u64);

impl Round {
    pub const ZERO: Self = Self(0);

    pub const fn new(r: u64) -> Self {
        Self(r)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn checked_next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    pub fn bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Round {
    fn from(r: u64) -> Self {
        Self(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prev_saturates_at_pre_genesis() {
        assert_eq!(Height::GENESIS.prev(), Height::PRE_GENESIS);
        assert_eq!(Height::PRE_GENESIS.prev(), Height::PRE_GENESIS);
        assert_eq!(Height::NIL.prev(), Height::PRE_GENESIS);
        assert_eq!(Height::new(10).prev(), Height::new(9));
    }

    #[test]
    fn next_saturates_at_max() {
        assert_eq!(Height::new(i64::MAX).next(), Height::new(i64::MAX));
        assert_eq!(Round::new(u64::MAX).next(), Round::new(u64::MAX));
    }

    #[test]
    fn checked_next_stops_at_max() {
        assert_eq!(Height::new(i64::MAX).checked_next(), None);
        assert_eq!(Height::new(4).checked_next(), Some(Height::new(5)));
        assert_eq!(Round::new(u64::MAX).checked_next(), None);
        assert_eq!(Round::ZERO.checked_next(), Some(Round::new(1)));
    }

    #[test]
    fn validity() {
        assert!(Height::GENESIS.is_valid());
        assert!(Height::PRE_GENESIS.is_valid());
        assert!(!Height::NIL.is_valid());
    }

    #[test]
    fn canonical_bytes_are_big_endian() {
        assert_eq!(Height::new(1).bytes(), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(Round::new(256).bytes(), [0, 0, 0, 0, 0, 0, 1, 0]);
    }
}
