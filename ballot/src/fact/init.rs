use serde::{Deserialize, Serialize};

use isaac_types::{optional_hash_bytes, Hash, Height, Hint, Round, Stage};

use super::{check_common, check_component, prefix_bytes, BallotFact};
use crate::error::BallotError;
use crate::hints;

/// Asserts that a new height (or a new round at the same height) should be
/// built on `previous_block`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitFact {
    #[serde(rename = "_hint")]
    hint: Hint,
    hash: Hash,
    height: Height,
    round: Round,
    previous_block: Option<Hash>,
}

impl InitFact {
    pub fn new(height: Height, round: Round, previous_block: impl Into<Option<Hash>>) -> Self {
        let mut fact = Self {
            hint: hints::INIT_BALLOT_FACT,
            hash: Hash::ZERO,
            height,
            round,
            previous_block: previous_block.into(),
        };
        fact.hash = isaac_crypto::sha256(&fact.bytes());
        fact
    }

    pub fn previous_block(&self) -> Option<&Hash> {
        self.previous_block.as_ref()
    }
}

impl BallotFact for InitFact {
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
        Stage::Init
    }

    fn bytes(&self) -> Vec<u8> {
        let previous = optional_hash_bytes(self.previous_block.as_ref());
        let mut buf = prefix_bytes(self.height, self.round, previous.len());
        buf.extend_from_slice(previous);
        buf
    }

    fn is_valid(&self) -> Result<(), BallotError> {
        check_common(&hints::INIT_BALLOT_FACT, self)?;
        check_component("previous block", self.previous_block.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use isaac_crypto::random_hash;

    #[test]
    fn bytes_layout() {
        let prev = random_hash();
        let fact = InitFact::new(Height::new(3), Round::new(1), prev);
        let bytes = fact.bytes();
        assert_eq!(bytes.len(), 8 + 8 + 32);
        assert_eq!(&bytes[..8], &3i64.to_be_bytes());
        assert_eq!(&bytes[8..16], &1u64.to_be_bytes());
        assert_eq!(&bytes[16..], prev.as_bytes());
    }

    #[test]
    fn empty_previous_block() {
        let absent = InitFact::new(Height::new(3), Round::ZERO, None);
        assert_eq!(absent.bytes().len(), 16);
        assert_eq!(absent.is_valid().unwrap_err().kind(), ErrorKind::InvalidFact);

        let zero = InitFact::new(Height::new(3), Round::ZERO, Hash::ZERO);
        assert_eq!(zero.is_valid().unwrap_err().kind(), ErrorKind::InvalidFact);
    }

    #[test]
    fn mutated_hash_does_not_match() {
        let mut fact = InitFact::new(Height::new(3), Round::ZERO, random_hash());
        fact.hash = random_hash();
        let err = fact.is_valid().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFact);
        assert!(err.to_string().contains("hash does not match"));
    }

    #[test]
    fn foreign_hint_rejected() {
        let mut fact = InitFact::new(Height::new(3), Round::ZERO, random_hash());
        fact.hint = hints::ACCEPT_BALLOT_FACT;
        assert_eq!(fact.is_valid().unwrap_err().kind(), ErrorKind::InvalidFact);
    }
}
