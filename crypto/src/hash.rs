//! SHA-256 hashing for facts, seal bodies and seals.

use isaac_types::Hash;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> Hash {
    Hash::new(Sha256::digest(data).into())
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn sha256_multi(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Hash::new(hasher.finalize().into())
}

/// A random, non-empty hash. Used for test fixtures and placeholder blocks.
pub fn random_hash() -> Hash {
    loop {
        let h = Hash::new(rand::random());
        if !h.is_zero() {
            return h;
        }
    }
}
