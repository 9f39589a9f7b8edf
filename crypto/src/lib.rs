//! Cryptographic primitives for the ISAAC+ ballot core.
//!
//! - **Ed25519** for signing and signature verification
//! - **SHA-256** for fact, body and seal hashes
//! - Node address derivation (`isc_` prefix, base58 with checksum)

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{decode_address, derive_address, is_address_of, validate_address};
pub use hash::{random_hash, sha256, sha256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature, Signer};
