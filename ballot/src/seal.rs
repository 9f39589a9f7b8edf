//! The ballot envelope.
//!
//! A seal carries a [`SignedBallotFact`] and the voteproof(s) that justify it,
//! and is signed a second time over its body:
//!
//! ```text
//! body_bytes = signed_fact.bytes() ‖ base_voteproof.bytes() ‖ accept_voteproof.bytes()?
//! body_hash  = sha256(body_bytes)
//! signature  = sign(body_hash ‖ network_id)
//! hash       = sha256(body_hash ‖ signer ‖ signature ‖ signed_at)
//! ```
//!
//! The same layout serves all three ballot stages; only the hint differs.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

use isaac_crypto::Signer;
use isaac_types::{
    Address, Hash, Height, Hint, NetworkId, PublicKey, Round, Signature, Stage, Timestamp,
};

use crate::error::BallotError;
use crate::fact::{AcceptFact, BallotFact, Fact, InitFact, ProposalFact};
use crate::fact_sign::FactSign;
use crate::hints;
use crate::signed_fact::SignedBallotFact;
use crate::voteproof::Voteproof;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seal {
    #[serde(rename = "_hint")]
    hint: Hint,
    hash: Hash,
    body_hash: Hash,
    signer: PublicKey,
    signature: Signature,
    signed_at: Timestamp,
    signed_fact: SignedBallotFact,
    base_voteproof: Voteproof,
    accept_voteproof: Option<Voteproof>,
}

/// The message a seal signature covers.
pub fn seal_signable(body_hash: &Hash, network_id: &NetworkId) -> Vec<u8> {
    let mut msg = Vec::with_capacity(Hash::LEN + network_id.as_bytes().len());
    msg.extend_from_slice(body_hash.as_bytes());
    msg.extend_from_slice(network_id.as_bytes());
    msg
}

impl Seal {
    /// Sign `fact` as `node` and wrap it with its voteproofs under `hint`.
    pub fn new(
        hint: Hint,
        fact: Fact,
        node: Address,
        base_voteproof: Voteproof,
        accept_voteproof: Option<Voteproof>,
        signer: &impl Signer,
        network_id: &NetworkId,
    ) -> Result<Self, BallotError> {
        fact.is_valid()?;

        let fact_signed_at = Timestamp::now();
        let signed_fact = SignedBallotFact::new_at(fact, node, signer, network_id, fact_signed_at);
        let mut seal = Self {
            hint,
            hash: Hash::ZERO,
            body_hash: Hash::ZERO,
            signer: signer.public_key(),
            signature: Signature([0u8; 64]),
            signed_at: Timestamp::EPOCH,
            signed_fact,
            base_voteproof,
            accept_voteproof,
        };
        seal.sign(signer, network_id, Timestamp::now_after(fact_signed_at));

        tracing::trace!(
            hint = %seal.hint,
            height = %seal.height(),
            round = %seal.round(),
            hash = %seal.hash,
            "seal signed"
        );
        Ok(seal)
    }

    pub fn new_init(
        fact: InitFact,
        node: Address,
        base_voteproof: Voteproof,
        accept_voteproof: impl Into<Option<Voteproof>>,
        signer: &impl Signer,
        network_id: &NetworkId,
    ) -> Result<Self, BallotError> {
        Self::new(
            hints::INIT_BALLOT,
            fact.into(),
            node,
            base_voteproof,
            accept_voteproof.into(),
            signer,
            network_id,
        )
    }

    pub fn new_proposal(
        fact: ProposalFact,
        node: Address,
        base_voteproof: Voteproof,
        signer: &impl Signer,
        network_id: &NetworkId,
    ) -> Result<Self, BallotError> {
        Self::new(
            hints::PROPOSAL,
            fact.into(),
            node,
            base_voteproof,
            None,
            signer,
            network_id,
        )
    }

    pub fn new_accept(
        fact: AcceptFact,
        node: Address,
        base_voteproof: Voteproof,
        signer: &impl Signer,
        network_id: &NetworkId,
    ) -> Result<Self, BallotError> {
        Self::new(
            hints::ACCEPT_BALLOT,
            fact.into(),
            node,
            base_voteproof,
            None,
            signer,
            network_id,
        )
    }

    /// Re-sign with a fresh fact signature and a fresh seal signature.
    ///
    /// The fact signature post-dates the previous seal signature and the new
    /// seal signature post-dates the new fact signature. The fact itself is
    /// unchanged.
    pub fn sign_with_fact(&mut self, node: Address, signer: &impl Signer, network_id: &NetworkId) {
        let fact_signed_at = Timestamp::now_after(self.signed_at);
        let fact = self.signed_fact.fact().clone();
        self.signed_fact = SignedBallotFact::new_at(fact, node, signer, network_id, fact_signed_at);
        self.sign(signer, network_id, Timestamp::now_after(fact_signed_at));

        tracing::trace!(
            hint = %self.hint,
            hash = %self.hash,
            signed_at = %self.signed_at,
            "seal re-signed"
        );
    }

    fn sign(&mut self, signer: &impl Signer, network_id: &NetworkId, signed_at: Timestamp) {
        self.signer = signer.public_key();
        self.signed_at = signed_at;
        self.body_hash = isaac_crypto::sha256(&self.body_bytes());
        self.signature = signer.sign(&seal_signable(&self.body_hash, network_id));
        self.hash = self.compute_hash();
    }

    /// `signed_fact ‖ base_voteproof ‖ accept_voteproof?`
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut buf = self.signed_fact.bytes();
        buf.extend_from_slice(&self.base_voteproof.bytes());
        if let Some(accept) = &self.accept_voteproof {
            buf.extend_from_slice(&accept.bytes());
        }
        buf
    }

    pub(crate) fn compute_hash(&self) -> Hash {
        isaac_crypto::sha256_multi(&[
            self.body_hash.as_bytes(),
            self.signer.as_bytes(),
            self.signature.as_bytes(),
            &self.signed_at.bytes(),
        ])
    }

    /// Validate and, on success, wrap the seal as read-only.
    pub fn validate(self, network_id: &NetworkId) -> Result<ValidatedSeal, (Seal, BallotError)> {
        match self.is_valid(network_id) {
            Ok(()) => Ok(ValidatedSeal(self)),
            Err(e) => Err((self, e)),
        }
    }

    pub fn hint(&self) -> &Hint {
        &self.hint
    }

    /// Stage named by the seal's hint; `Unknown` for a foreign hint.
    pub fn stage(&self) -> Stage {
        hints::seal_stage(&self.hint).unwrap_or_default()
    }

    pub fn hash(&self) -> Hash {
        self.hash
    }

    pub fn body_hash(&self) -> Hash {
        self.body_hash
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

    pub fn signed_fact(&self) -> &SignedBallotFact {
        &self.signed_fact
    }

    pub fn fact(&self) -> &Fact {
        self.signed_fact.fact()
    }

    pub fn fact_sign(&self) -> &FactSign {
        self.signed_fact.fact_sign()
    }

    pub fn node(&self) -> &Address {
        self.signed_fact.node()
    }

    pub fn height(&self) -> Height {
        self.fact().height()
    }

    pub fn round(&self) -> Round {
        self.fact().round()
    }

    pub fn base_voteproof(&self) -> &Voteproof {
        &self.base_voteproof
    }

    pub fn accept_voteproof(&self) -> Option<&Voteproof> {
        self.accept_voteproof.as_ref()
    }

    /// The voteproof that finalized the previous height: the attached accept
    /// voteproof, or the base voteproof when it is itself an ACCEPT one.
    pub fn accept_voteproof_or_base(&self) -> Option<&Voteproof> {
        self.accept_voteproof.as_ref().or_else(|| {
            (self.base_voteproof.stage() == Stage::Accept).then_some(&self.base_voteproof)
        })
    }
}

/// A seal that passed [`Seal::is_valid`]. Read-only; re-signing hands back a
/// plain [`Seal`] that must be validated again.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedSeal(Seal);

impl ValidatedSeal {
    pub fn into_inner(self) -> Seal {
        self.0
    }

    pub fn sign_with_fact(
        self,
        node: Address,
        signer: &impl Signer,
        network_id: &NetworkId,
    ) -> Seal {
        let mut seal = self.0;
        seal.sign_with_fact(node, signer, network_id);
        seal
    }
}

impl Deref for ValidatedSeal {
    type Target = Seal;

    fn deref(&self) -> &Seal {
        &self.0
    }
}
