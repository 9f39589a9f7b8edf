//! Node address.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// Identifies a consensus node.
///
/// Addresses are short ASCII strings; `isaac_crypto::derive_address` builds
/// one from a public key, but any well-formed string is accepted.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub const MAX_LEN: usize = 100;

    /// Create an address, rejecting malformed input.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let addr = Self(raw.into());
        addr.check()?;
        Ok(addr)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical bytes: the UTF-8 encoding.
    pub fn bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    fn check(&self) -> Result<(), TypeError> {
        if self.0.is_empty() {
            return Err(TypeError::InvalidAddress("empty address".into()));
        }
        if self.0.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidAddress(format!(
                "too long address; len={}",
                self.0.len()
            )));
        }
        if let Some(c) = self
            .0
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(TypeError::InvalidAddress(format!(
                "unexpected character {c:?} in {:?}",
                self.0
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
