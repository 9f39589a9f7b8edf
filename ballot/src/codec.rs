//! Wire formats.
//!
//! Two encodings are supported: a self-describing JSON document and a
//! compact binary form (`bincode`, fixed-width little-endian integers). In
//! both, every hinted object starts with its `_hint`, so a reader can learn
//! what it is holding before decoding the rest.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use isaac_types::Hint;

use crate::error::BallotError;
use crate::hints;
use crate::registry::REGISTRY;
use crate::seal::Seal;

/// Encodes and decodes hinted objects.
pub trait Codec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, BallotError>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BallotError>;
    /// Read only the leading `_hint` of an encoded object.
    fn decode_hint(&self, bytes: &[u8]) -> Result<Hint, BallotError>;
}

#[derive(Deserialize)]
struct HintedHead {
    #[serde(rename = "_hint")]
    hint: Hint,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, BallotError> {
        serde_json::to_vec(value).map_err(|e| BallotError::Codec(format!("json encode: {e}")))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BallotError> {
        serde_json::from_slice(bytes).map_err(|e| BallotError::Codec(format!("json decode: {e}")))
    }

    fn decode_hint(&self, bytes: &[u8]) -> Result<Hint, BallotError> {
        let head: HintedHead = serde_json::from_slice(bytes)
            .map_err(|e| BallotError::Codec(format!("json hint: {e}")))?;
        Ok(head.hint)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    fn options() -> impl Options {
        bincode::DefaultOptions::new().with_fixint_encoding()
    }
}

impl Codec for BinaryCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, BallotError> {
        Self::options()
            .serialize(value)
            .map_err(|e| BallotError::Codec(format!("binary encode: {e}")))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BallotError> {
        Self::options()
            .deserialize(bytes)
            .map_err(|e| BallotError::Codec(format!("binary decode: {e}")))
    }

    fn decode_hint(&self, bytes: &[u8]) -> Result<Hint, BallotError> {
        let head: HintedHead = Self::options()
            .allow_trailing_bytes()
            .deserialize(bytes)
            .map_err(|e| BallotError::Codec(format!("binary hint: {e}")))?;
        Ok(head.hint)
    }
}

/// Which wire format to speak; chosen by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Json,
    Binary,
}

impl WireFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WireFormat {
    type Err = BallotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "binary" => Ok(Self::Binary),
            other => Err(BallotError::Config(format!("unknown wire format {other:?}"))),
        }
    }
}

impl Codec for WireFormat {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, BallotError> {
        match self {
            Self::Json => JsonCodec.encode(value),
            Self::Binary => BinaryCodec.encode(value),
        }
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, BallotError> {
        match self {
            Self::Json => JsonCodec.decode(bytes),
            Self::Binary => BinaryCodec.decode(bytes),
        }
    }

    fn decode_hint(&self, bytes: &[u8]) -> Result<Hint, BallotError> {
        match self {
            Self::Json => JsonCodec.decode_hint(bytes),
            Self::Binary => BinaryCodec.decode_hint(bytes),
        }
    }
}

/// Decode a ballot of any stage, dispatching on its top-level hint.
///
/// The seal is only decoded, not validated; call [`Seal::is_valid`] before
/// trusting it.
pub fn decode_ballot<C: Codec>(bytes: &[u8], codec: &C) -> Result<Seal, BallotError> {
    let hint = codec.decode_hint(bytes)?;
    REGISTRY.resolve(&hint)?;
    let stage = hints::seal_stage(&hint).ok_or_else(|| {
        BallotError::IncompatibleHint(format!("{hint} is not a ballot hint"))
    })?;

    let seal: Seal = codec.decode(bytes)?;
    tracing::trace!(%hint, %stage, hash = %seal.hash(), "ballot decoded");
    Ok(seal)
}
