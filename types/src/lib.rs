//! Fundamental types for the ISAAC+ ballot core.
//!
//! This crate defines the primitive types shared across every other crate in
//! the workspace: heights, rounds, stages, hashes, addresses, keys, hints,
//! timestamps and network identifiers.

pub mod address;
pub mod error;
pub mod hash;
pub mod height;
pub mod hint;
pub mod keys;
pub mod network;
pub mod stage;
pub mod time;

pub use address::Address;
pub use error::TypeError;
pub use hash::{optional_hash_bytes, Hash};
pub use height::{Height, Round};
pub use hint::{Hint, HintType, Version};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use stage::{Stage, VoteResult};
pub use time::Timestamp;
