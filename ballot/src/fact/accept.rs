use serde::{Deserialize, Serialize};

use isaac_types::{optional_hash_bytes, Hash, Height, Hint, Round, Stage};

use super::{check_common, check_component, prefix_bytes, BallotFact};
use crate::error::BallotError;
use crate::hints;

/// Asserts that `proposal` produced `new_block` at this height and round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptFact {
    #[serde(rename = "_hint")]
    hint: Hint,
    hash: Hash,
    height: Height,
    round: Round,
    proposal: Option<Hash>,
    new_block: Option<Hash>,
}

impl AcceptFact {
    pub fn new(
        height: Height,
        round: Round,
        proposal: impl Into<Option<Hash>>,
        new_block: impl Into<Option<Hash>>,
    ) -> Self {
        let mut fact = Self {
            hint: hints::ACCEPT_BALLOT_FACT,
            hash: Hash::ZERO,
            height,
            round,
            proposal: proposal.into(),
            new_block: new_block.into(),
        };
        fact.hash = isaac_crypto::sha256(&fact.bytes());
        fact
    }

    pub fn proposal(&self) -> Option<&Hash> {
        self.proposal.as_ref()
    }

    pub fn new_block(&self) -> Option<&Hash> {
        self.new_block.as_ref()
    }
}

impl BallotFact for AcceptFact {
    fn hint(&self) -> &Hint {
        &self.hint
    }

    fn hash(&self) -> Hash {
        self.hash
    }

    fn height(&self) -> Height {
        self.height
    }

    fn round(&self) -> Round {
        self.round
    }

    fn stage(&self) -> Stage {
        Stage::Accept
    }

    fn bytes(&self) -> Vec<u8> {
        let proposal = optional_hash_bytes(self.proposal.as_ref());
        let new_block = optional_hash_bytes(self.new_block.as_ref());
        let mut buf = prefix_bytes(self.height, self.round, proposal.len() + new_block.len());
        buf.extend_from_slice(proposal);
        buf.extend_from_slice(new_block);
        buf
    }

    fn is_valid(&self) -> Result<(), BallotError> {
        check_common(&hints::ACCEPT_BALLOT_FACT, self)?;
        check_component("proposal", self.proposal.as_ref())?;
        check_component("new block", self.new_block.as_ref())
    }
}
