//! Ed25519 message signing and verification.

use ed25519_dalek::Signer as _;
use ed25519_dalek::{SigningKey, Verifier, VerifyingKey};
use isaac_types::{KeyPair, PrivateKey, PublicKey, Signature};

/// Anything that can sign on behalf of a node.
///
/// Ballot construction only needs these two operations, so callers may plug
/// in an HSM-backed or remote signer instead of a raw key.
pub trait Signer {
    fn public_key(&self) -> PublicKey;
    fn sign(&self, message: &[u8]) -> Signature;
}

impl Signer for PrivateKey {
    fn public_key(&self) -> PublicKey {
        crate::keys::public_from_private(self)
    }

    fn sign(&self, message: &[u8]) -> Signature {
        sign_message(message, self)
    }
}

impl Signer for KeyPair {
    fn public_key(&self) -> PublicKey {
        self.public.clone()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        sign_message(message, &self.private)
    }
}

pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    Signature(SigningKey::from_bytes(&private_key.0).sign(message).to_bytes())
}

/// `false` for a bad signature and for a public key that is not a curve
/// point; callers map either to a signature failure.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    VerifyingKey::from_bytes(&public_key.0)
        .map(|key| {
            key.verify(message, &ed25519_dalek::Signature::from_bytes(&signature.0))
                .is_ok()
        })
        .unwrap_or(false)
}
