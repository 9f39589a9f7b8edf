//! Ed25519 key material.

use ed25519_dalek::SigningKey;
use isaac_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;

fn from_signing_key(key: &SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(key.verifying_key().to_bytes()),
        private: PrivateKey(key.to_bytes()),
    }
}

/// A fresh key pair from the OS random source.
pub fn generate_keypair() -> KeyPair {
    from_signing_key(&SigningKey::generate(&mut OsRng))
}

pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

/// Rebuild the pair around an existing secret.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    KeyPair {
        public: public_from_private(&private),
        private,
    }
}

/// Deterministic key pair; the seed is the secret scalar.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    from_signing_key(&SigningKey::from_bytes(seed))
}
