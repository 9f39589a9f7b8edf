//! The author's signature over a fact hash.

use serde::{Deserialize, Serialize};

use isaac_crypto::{decode_address, verify_signature, Signer};
use isaac_types::{Address, Hash, Hint, NetworkId, PublicKey, Signature, Timestamp};

use crate::error::BallotError;
use crate::hints;

/// Binds `node` to a fact: `signature` is `signer` over
/// `fact_hash ‖ network_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSign {
    #[serde(rename = "_hint")]
    hint: Hint,
    node: Address,
    signer: PublicKey,
    signature: Signature,
    signed_at: Timestamp,
}

/// The message a fact signature covers.
pub fn fact_signable(fact_hash: &Hash, network_id: &NetworkId) -> Vec<u8> {
    let mut msg = Vec::with_capacity(Hash::LEN + network_id.as_bytes().len());
    msg.extend_from_slice(fact_hash.as_bytes());
    msg.extend_from_slice(network_id.as_bytes());
    msg
}

impl FactSign {
    /// Sign `fact_hash` now.
    pub fn new(
        fact_hash: &Hash,
        node: Address,
        signer: &impl Signer,
        network_id: &NetworkId,
    ) -> Self {
        Self::new_at(fact_hash, node, signer, network_id, Timestamp::now())
    }

    /// Sign `fact_hash`, recording `signed_at` as the signing time.
    pub fn new_at(
        fact_hash: &Hash,
        node: Address,
        signer: &impl Signer,
        network_id: &NetworkId,
        signed_at: Timestamp,
    ) -> Self {
        let signature = signer.sign(&fact_signable(fact_hash, network_id));
        Self {
            hint: hints::BALLOT_FACT_SIGN,
            node,
            signer: signer.public_key(),
            signature,
            signed_at,
        }
    }

    pub fn node(&self) -> &Address {
        &self.node
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn signed_at(&self) -> Timestamp {
        self.signed_at
    }

    /// `node ‖ signer ‖ signature ‖ signed_at`
    pub fn bytes(&self) -> Vec<u8> {
        let node = self.node.bytes();
        let mut buf = Vec::with_capacity(node.len() + 32 + 64 + 8);
        buf.extend_from_slice(node);
        buf.extend_from_slice(self.signer.as_bytes());
        buf.extend_from_slice(self.signature.as_bytes());
        buf.extend_from_slice(&self.signed_at.bytes());
        buf
    }

    pub fn is_valid(&self, fact_hash: &Hash, network_id: &NetworkId) -> Result<(), BallotError> {
        Hint::is_compatible(&self.hint, &hints::BALLOT_FACT_SIGN)?;

        if !self.node.is_valid() {
            return Err(BallotError::Invalid(format!("invalid node {:?}", self.node)));
        }
        if self.signature.is_empty() {
            return Err(BallotError::EmptyField("empty fact signature".into()));
        }
        if self.signed_at.is_zero() {
            return Err(BallotError::EmptyField("empty fact signed_at".into()));
        }
        if !verify_signature(
            &fact_signable(fact_hash, network_id),
            &self.signature,
            &self.signer,
        ) {
            return Err(BallotError::SignatureFailure(format!(
                "fact signature by {} does not verify",
                self.node
            )));
        }
        // Opaque addresses carry no key binding; derived ones must match.
        if let Some(bound) = decode_address(self.node.as_str()) {
            if bound != self.signer {
                return Err(BallotError::SignatureFailure(format!(
                    "node {} is bound to another key than signer {}",
                    self.node, self.signer
                )));
            }
        }
        Ok(())
    }
}
