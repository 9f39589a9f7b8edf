//! Type/version tags that identify concrete variants on the wire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;

/// Semantic version of a hinted object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix('v').unwrap_or(s);
        let mut parts = body.split('.');
        let mut next = || -> Result<u32, TypeError> {
            parts
                .next()
                .ok_or_else(|| TypeError::InvalidVersion(format!("{s:?}: missing component")))?
                .parse()
                .map_err(|e| TypeError::InvalidVersion(format!("{s:?}: {e}")))
        };
        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(TypeError::InvalidVersion(format!(
                "{s:?}: too many components"
            )));
        }
        Ok(version)
    }
}

/// Registered identifier of a hinted object, e.g. `init-ballot`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HintType(Cow<'static, str>);

impl HintType {
    pub const MAX_LEN: usize = 100;

    /// Build a type from a literal known to be well-formed. Used for the
    /// built-in hint constants; parsed input goes through [`HintType::new`].
    pub const fn from_static(raw: &'static str) -> Self {
        Self(Cow::Borrowed(raw))
    }

    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidHint(format!(
                "hint type length out of range; len={}",
                raw.len()
            )));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(TypeError::InvalidHint(format!(
                "hint type {raw:?} has characters outside [a-z0-9-]"
            )));
        }
        Ok(Self(Cow::Owned(raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `(type, version)` pair. Text form is `"<type>-v<major>.<minor>.<patch>"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hint {
    ty: HintType,
    version: Version,
}

impl Hint {
    pub const fn new(ty: HintType, version: Version) -> Self {
        Self { ty, version }
    }

    pub fn ty(&self) -> &HintType {
        &self.ty
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Check that an object written with `writer` can be read as `reader`:
    /// same type, same major version, and the reader is not newer than the
    /// writer.
    pub fn is_compatible(writer: &Hint, reader: &Hint) -> Result<(), TypeError> {
        if writer.ty != reader.ty {
            return Err(TypeError::IncompatibleHint(format!(
                "type does not match; writer={writer} reader={reader}"
            )));
        }
        if writer.version.major != reader.version.major {
            return Err(TypeError::IncompatibleHint(format!(
                "major version does not match; writer={writer} reader={reader}"
            )));
        }
        if reader.version > writer.version {
            return Err(TypeError::IncompatibleHint(format!(
                "reader is newer than writer; writer={writer} reader={reader}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ty, self.version)
    }
}

impl FromStr for Hint {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ty, version) = s
            .rsplit_once("-v")
            .ok_or_else(|| TypeError::InvalidHint(format!("{s:?}: missing version")))?;
        Ok(Self::new(HintType::new(ty)?, version.parse()?))
    }
}

impl Serialize for Hint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
