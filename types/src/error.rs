//! Parse and construction errors for primitive types.

use thiserror::Error;

/// Error raised while building or parsing a primitive type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid hint: {0}")]
    InvalidHint(String),

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("incompatible hint: {0}")]
    IncompatibleHint(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
