use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use isaac_types::{Address, Hash, Height, Hint, Round, Stage, Timestamp};

use super::{check_common, prefix_bytes, BallotFact};
use crate::error::BallotError;
use crate::hints;

/// A proposer's suggested block contents for this height and round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalFact {
    #[serde(rename = "_hint")]
    hint: Hint,
    hash: Hash,
    height: Height,
    round: Round,
    proposer: Option<Address>,
    operations: Vec<Hash>,
    proposed_at: Timestamp,
}

impl ProposalFact {
    pub fn new(
        height: Height,
        round: Round,
        proposer: impl Into<Option<Address>>,
        operations: Vec<Hash>,
        proposed_at: Timestamp,
    ) -> Self {
        let mut fact = Self {
            hint: hints::PROPOSAL_FACT,
            hash: Hash::ZERO,
            height,
            round,
            proposer: proposer.into(),
            operations,
            proposed_at,
        };
        fact.hash = isaac_crypto::sha256(&fact.bytes());
        fact
    }

    pub fn proposer(&self) -> Option<&Address> {
        self.proposer.as_ref()
    }

    pub fn operations(&self) -> &[Hash] {
        &self.operations
    }

    pub fn proposed_at(&self) -> Timestamp {
        self.proposed_at
    }
}

impl BallotFact for ProposalFact {
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
        Stage::Proposal
    }

    fn bytes(&self) -> Vec<u8> {
        let proposer = self.proposer.as_ref().map(Address::bytes).unwrap_or_default();
        let mut buf = prefix_bytes(
            self.height,
            self.round,
            proposer.len() + self.operations.len() * Hash::LEN + 8,
        );
        buf.extend_from_slice(proposer);
        for op in &self.operations {
            buf.extend_from_slice(op.as_bytes());
        }
        buf.extend_from_slice(&self.proposed_at.bytes());
        buf
    }

    fn is_valid(&self) -> Result<(), BallotError> {
        check_common(&hints::PROPOSAL_FACT, self)?;

        match &self.proposer {
            None => return Err(BallotError::InvalidFact("empty proposer".into())),
            Some(p) if !p.is_valid() => {
                return Err(BallotError::InvalidFact(format!("invalid proposer {p:?}")))
            }
            Some(_) => {}
        }

        let mut seen = HashSet::with_capacity(self.operations.len());
        for (i, op) in self.operations.iter().enumerate() {
            if op.is_zero() {
                return Err(BallotError::InvalidFact(format!("empty operation at {i}")));
            }
            if !seen.insert(op) {
                return Err(BallotError::InvalidFact(format!(
                    "duplicate operation {op} at {i}"
                )));
            }
        }

        if self.proposed_at.is_zero() {
            return Err(BallotError::InvalidFact("empty proposed_at".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use isaac_crypto::random_hash;

    fn proposer() -> Address {
        Address::new("n0").unwrap()
    }

    #[test]
    fn operations_hashed_in_declared_order() {
        let (a, b) = (random_hash(), random_hash());
        let t = Timestamp::from_nanos(10);
        let ab = ProposalFact::new(Height::new(3), Round::ZERO, proposer(), vec![a, b], t);
        let ba = ProposalFact::new(Height::new(3), Round::ZERO, proposer(), vec![b, a], t);
        assert_ne!(ab.hash(), ba.hash());
        assert_eq!(ab.bytes().len(), 16 + 2 + 64 + 8);
    }

    #[test]
    fn empty_operations_are_fine() {
        let fact = ProposalFact::new(Height::new(3), Round::ZERO, proposer(), vec![], Timestamp::now());
        fact.is_valid().unwrap();
    }

    #[test]
    fn missing_proposer() {
        let fact = ProposalFact::new(Height::new(3), Round::ZERO, None, vec![], Timestamp::now());
        let err = fact.is_valid().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFact);
        assert!(err.to_string().contains("empty proposer"));
    }

    #[test]
    fn duplicate_operation() {
        let op = random_hash();
        let fact = ProposalFact::new(
            Height::new(3),
            Round::ZERO,
            proposer(),
            vec![op, random_hash(), op],
            Timestamp::now(),
        );
        let err = fact.is_valid().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFact);
        assert!(err.to_string().contains("duplicate operation"));
    }

    #[test]
    fn zero_timestamp() {
        let fact = ProposalFact::new(Height::new(3), Round::ZERO, proposer(), vec![], Timestamp::EPOCH);
        assert_eq!(fact.is_valid().unwrap_err().kind(), ErrorKind::InvalidFact);
    }
}
