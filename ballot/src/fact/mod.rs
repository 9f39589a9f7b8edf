//! Facts: the immutable, content-addressed assertions ballots vote on.
//!
//! Every variant carries `(hint, hash, height, round)` followed by its own
//! fields. The stored hash is the SHA-256 of [`BallotFact::bytes`], whose
//! layout is frozen:
//!
//! | Variant  | Canonical bytes                                                  |
//! |----------|------------------------------------------------------------------|
//! | INIT     | `height ‖ round ‖ previous_block`                                |
//! | Proposal | `height ‖ round ‖ proposer ‖ operations… ‖ proposed_at`          |
//! | ACCEPT   | `height ‖ round ‖ proposal ‖ new_block`                          |
//!
//! Absent components contribute no bytes.

mod accept;
mod init;
mod proposal;

pub use accept::AcceptFact;
pub use init::InitFact;
pub use proposal::ProposalFact;

use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer, StrDeserializer, StringDeserializer};
use serde::de::{self, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use isaac_types::{Address, Hash, Height, Hint, Round, Stage, Timestamp};

use crate::error::BallotError;
use crate::hints;
use crate::registry::REGISTRY;

/// Capabilities every fact exposes, whichever variant it is.
pub trait BallotFact {
    fn hint(&self) -> &Hint;
    fn hash(&self) -> Hash;
    fn height(&self) -> Height;
    fn round(&self) -> Round;
    fn stage(&self) -> Stage;
    /// Canonical bytes; the stored hash is their SHA-256.
    fn bytes(&self) -> Vec<u8>;
    fn is_valid(&self) -> Result<(), BallotError>;
}

/// A fact of any stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Fact {
    Init(InitFact),
    Proposal(ProposalFact),
    Accept(AcceptFact),
}

pub fn new_init_fact(
    height: Height,
    round: Round,
    previous_block: impl Into<Option<Hash>>,
) -> Fact {
    Fact::Init(InitFact::new(height, round, previous_block))
}

pub fn new_proposal_fact(
    height: Height,
    round: Round,
    proposer: impl Into<Option<Address>>,
    operations: Vec<Hash>,
    proposed_at: Timestamp,
) -> Fact {
    Fact::Proposal(ProposalFact::new(
        height,
        round,
        proposer,
        operations,
        proposed_at,
    ))
}

pub fn new_accept_fact(
    height: Height,
    round: Round,
    proposal: impl Into<Option<Hash>>,
    new_block: impl Into<Option<Hash>>,
) -> Fact {
    Fact::Accept(AcceptFact::new(height, round, proposal, new_block))
}

impl Fact {
    pub fn as_init(&self) -> Option<&InitFact> {
        match self {
            Self::Init(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_proposal(&self) -> Option<&ProposalFact> {
        match self {
            Self::Proposal(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_accept(&self) -> Option<&AcceptFact> {
        match self {
            Self::Accept(f) => Some(f),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn BallotFact {
        match self {
            Self::Init(f) => f,
            Self::Proposal(f) => f,
            Self::Accept(f) => f,
        }
    }
}

impl BallotFact for Fact {
    fn hint(&self) -> &Hint {
        self.inner().hint()
    }

    fn hash(&self) -> Hash {
        self.inner().hash()
    }

    fn height(&self) -> Height {
        self.inner().height()
    }

    fn round(&self) -> Round {
        self.inner().round()
    }

    fn stage(&self) -> Stage {
        self.inner().stage()
    }

    fn bytes(&self) -> Vec<u8> {
        self.inner().bytes()
    }

    fn is_valid(&self) -> Result<(), BallotError> {
        self.inner().is_valid()
    }
}

impl From<InitFact> for Fact {
    fn from(f: InitFact) -> Self {
        Self::Init(f)
    }
}

impl From<ProposalFact> for Fact {
    fn from(f: ProposalFact) -> Self {
        Self::Proposal(f)
    }
}

impl From<AcceptFact> for Fact {
    fn from(f: AcceptFact) -> Self {
        Self::Accept(f)
    }
}

/// Checks shared by all variants: hint, stored hash and height.
pub(crate) fn check_common(
    expected: &Hint,
    fact: &dyn BallotFact,
) -> Result<(), BallotError> {
    Hint::is_compatible(fact.hint(), expected)
        .map_err(|e| BallotError::InvalidFact(e.to_string()))?;

    let stored = fact.hash();
    if stored.is_zero() {
        return Err(BallotError::InvalidFact("empty hash".into()));
    }
    let recomputed = isaac_crypto::sha256(&fact.bytes());
    if recomputed != stored {
        return Err(BallotError::InvalidFact(format!(
            "hash does not match; stored={stored} recomputed={recomputed}"
        )));
    }

    if fact.height() <= Height::PRE_GENESIS {
        return Err(BallotError::InvalidFact(format!(
            "height {} is not above pre-genesis",
            fact.height()
        )));
    }
    Ok(())
}

/// A component hash must be present and non-empty.
pub(crate) fn check_component(name: &str, hash: Option<&Hash>) -> Result<(), BallotError> {
    match hash {
        None => Err(BallotError::InvalidFact(format!("empty {name}"))),
        Some(h) if h.is_zero() => Err(BallotError::InvalidFact(format!("empty {name}"))),
        Some(_) => Ok(()),
    }
}

pub(crate) fn prefix_bytes(height: Height, round: Round, capacity: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + capacity);
    buf.extend_from_slice(&height.bytes());
    buf.extend_from_slice(&round.bytes());
    buf
}

// ── Hint-dispatched decoding ────────────────────────────────────────────

const HINT_KEY: &str = "_hint";

/// Union of the variant field names, in wire order.
const FACT_FIELDS: &[&str] = &[
    HINT_KEY,
    "hash",
    "height",
    "round",
    "previous_block",
    "proposer",
    "operations",
    "proposed_at",
    "proposal",
    "new_block",
];

impl<'de> Deserialize<'de> for Fact {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_struct("Fact", FACT_FIELDS, FactVisitor)
    }
}

struct FactVisitor;

fn fact_stage_of<E: de::Error>(hint: &Hint) -> Result<Stage, E> {
    REGISTRY.resolve(hint).map_err(E::custom)?;
    hints::fact_stage(hint).ok_or_else(|| E::custom(format!("{hint} is not a fact hint")))
}

impl<'de> Visitor<'de> for FactVisitor {
    type Value = Fact;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a fact whose first field is {HINT_KEY}")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let key: Option<String> = map.next_key()?;
        if key.as_deref() != Some(HINT_KEY) {
            return Err(de::Error::custom(format!(
                "{HINT_KEY} must be the first field of a fact"
            )));
        }
        let hint: Hint = map.next_value()?;
        let stage = fact_stage_of::<A::Error>(&hint)?;
        let rest = MapAccessDeserializer::new(WithHint::new(&hint, map));
        match stage {
            Stage::Init => InitFact::deserialize(rest).map(Fact::Init),
            Stage::Proposal => ProposalFact::deserialize(rest).map(Fact::Proposal),
            _ => AcceptFact::deserialize(rest).map(Fact::Accept),
        }
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let hint: Hint = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let stage = fact_stage_of::<A::Error>(&hint)?;
        let rest = SeqAccessDeserializer::new(WithHint::new(&hint, seq));
        match stage {
            Stage::Init => InitFact::deserialize(rest).map(Fact::Init),
            Stage::Proposal => ProposalFact::deserialize(rest).map(Fact::Proposal),
            _ => AcceptFact::deserialize(rest).map(Fact::Accept),
        }
    }
}

/// Replays an already-consumed `_hint` ahead of the remaining fields, so the
/// variant's own `Deserialize` sees the complete object.
struct WithHint<A> {
    hint: Option<String>,
    key_sent: bool,
    inner: A,
}

impl<A> WithHint<A> {
    fn new(hint: &Hint, inner: A) -> Self {
        Self {
            hint: Some(hint.to_string()),
            key_sent: false,
            inner,
        }
    }
}

impl<'de, A: MapAccess<'de>> MapAccess<'de> for WithHint<A> {
    type Error = A::Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        if self.hint.is_some() && !self.key_sent {
            self.key_sent = true;
            let key: StrDeserializer<'_, A::Error> = HINT_KEY.into_deserializer();
            return seed.deserialize(key).map(Some);
        }
        self.inner.next_key_seed(seed)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, Self::Error> {
        match self.hint.take() {
            Some(hint) => {
                let value: StringDeserializer<A::Error> = hint.into_deserializer();
                seed.deserialize(value)
            }
            None => self.inner.next_value_seed(seed),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        self.inner
            .size_hint()
            .map(|n| n + usize::from(self.hint.is_some()))
    }
}

impl<'de, A: SeqAccess<'de>> SeqAccess<'de> for WithHint<A> {
    type Error = A::Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        match self.hint.take() {
            Some(hint) => {
                let value: StringDeserializer<A::Error> = hint.into_deserializer();
                seed.deserialize(value).map(Some)
            }
            None => self.inner.next_element_seed(seed),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        self.inner
            .size_hint()
            .map(|n| n + usize::from(self.hint.is_some()))
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
    fn hash_is_sha256_of_bytes() {
        let facts = [
            new_init_fact(Height::new(3), Round::ZERO, random_hash()),
            new_proposal_fact(
                Height::new(3),
                Round::new(1),
                proposer(),
                vec![random_hash(), random_hash()],
                Timestamp::now(),
            ),
            new_accept_fact(Height::new(3), Round::new(2), random_hash(), random_hash()),
        ];
        for fact in &facts {
            assert_eq!(fact.hash(), isaac_crypto::sha256(&fact.bytes()));
            fact.is_valid().unwrap();
        }
    }

    #[test]
    fn stage_follows_variant() {
        assert_eq!(
            new_init_fact(Height::new(1), Round::ZERO, random_hash()).stage(),
            Stage::Init
        );
        let accept = new_accept_fact(Height::new(1), Round::ZERO, random_hash(), random_hash());
        assert_eq!(accept.stage(), Stage::Accept);
        assert!(accept.as_accept().is_some());
        assert!(accept.as_init().is_none());
    }

    #[test]
    fn json_decode_dispatches_on_hint() {
        let fact = new_accept_fact(Height::new(9), Round::new(4), random_hash(), random_hash());
        let json = serde_json::to_string(&fact).unwrap();
        assert!(json.starts_with(r#"{"_hint":"accept-ballot-fact-v0.0.1""#));
        let back: Fact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fact);
    }

    #[test]
    fn binary_decode_dispatches_on_hint() {
        let fact = new_proposal_fact(
            Height::new(2),
            Round::ZERO,
            proposer(),
            vec![random_hash()],
            Timestamp::from_nanos(77),
        );
        let bytes = bincode::serialize(&fact).unwrap();
        let back: Fact = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, fact);
    }

    #[test]
    fn hint_must_come_first() {
        let json = format!(
            r#"{{"hash":"{}","_hint":"init-ballot-fact-v0.0.1"}}"#,
            random_hash()
        );
        let err = serde_json::from_str::<Fact>(&json).unwrap_err();
        assert!(err.to_string().contains("_hint must be the first field"));
    }

    #[test]
    fn non_fact_hint_rejected() {
        let fact = new_init_fact(Height::new(1), Round::ZERO, random_hash());
        let json = serde_json::to_string(&fact)
            .unwrap()
            .replace("init-ballot-fact-v0.0.1", "voteproof-v0.0.1");
        assert!(serde_json::from_str::<Fact>(&json).is_err());
    }

    #[test]
    fn pre_genesis_height_invalid() {
        let fact = new_init_fact(Height::PRE_GENESIS, Round::ZERO, random_hash());
        assert_eq!(fact.is_valid().unwrap_err().kind(), ErrorKind::InvalidFact);
        let fact = new_init_fact(Height::GENESIS, Round::ZERO, random_hash());
        assert!(fact.is_valid().is_ok());
    }
}
