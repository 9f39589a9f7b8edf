//! A fact together with its author's signature.

use serde::{Deserialize, Serialize};

use isaac_crypto::Signer;
use isaac_types::{Address, Hint, NetworkId, Timestamp};

use crate::error::BallotError;
use crate::fact::{BallotFact, Fact};
use crate::fact_sign::FactSign;
use crate::hints;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBallotFact {
    #[serde(rename = "_hint")]
    hint: Hint,
    fact: Fact,
    fact_sign: FactSign,
}

impl SignedBallotFact {
    /// Sign `fact` as `node`, now.
    pub fn new(fact: Fact, node: Address, signer: &impl Signer, network_id: &NetworkId) -> Self {
        Self::new_at(fact, node, signer, network_id, Timestamp::now())
    }

    pub fn new_at(
        fact: Fact,
        node: Address,
        signer: &impl Signer,
        network_id: &NetworkId,
        signed_at: Timestamp,
    ) -> Self {
        let fact_sign = FactSign::new_at(&fact.hash(), node, signer, network_id, signed_at);
        Self::from_parts(fact, fact_sign)
    }

    /// Pair a fact with an existing signature. Nothing is checked until
    /// [`SignedBallotFact::is_valid`].
    pub fn from_parts(fact: Fact, fact_sign: FactSign) -> Self {
        Self {
            hint: hints::SIGNED_BALLOT_FACT,
            fact,
            fact_sign,
        }
    }

    pub fn fact(&self) -> &Fact {
        &self.fact
    }

    pub fn fact_sign(&self) -> &FactSign {
        &self.fact_sign
    }

    pub fn node(&self) -> &Address {
        self.fact_sign.node()
    }

    /// `fact.bytes() ‖ fact_sign.bytes()`
    pub fn bytes(&self) -> Vec<u8> {
        let mut buf = self.fact.bytes();
        buf.extend_from_slice(&self.fact_sign.bytes());
        buf
    }

    pub fn is_valid(&self, network_id: &NetworkId) -> Result<(), BallotError> {
        Hint::is_compatible(&self.hint, &hints::SIGNED_BALLOT_FACT)?;
        self.fact.is_valid()?;
        self.fact_sign
            .is_valid(&self.fact.hash(), network_id)
            .map_err(|e| e.context("invalid fact sign"))
    }
}
