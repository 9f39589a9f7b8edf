//! Evidence that a stage reached a conclusion at some height and round.
//!
//! A voteproof collects the signed facts the suffrage voted with and records
//! the outcome. The tally itself happens elsewhere; this type only carries
//! and structurally checks the result.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use isaac_types::{Address, Hash, Height, Hint, NetworkId, Round, Stage, Timestamp, VoteResult};

use crate::error::BallotError;
use crate::fact::{BallotFact, Fact};
use crate::hints;
use crate::signed_fact::SignedBallotFact;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Voteproof {
    #[serde(rename = "_hint")]
    hint: Hint,
    height: Height,
    round: Round,
    stage: Stage,
    result: VoteResult,
    threshold_ratio: f64,
    suffrages: Vec<Address>,
    majority: Option<Fact>,
    facts: Vec<Fact>,
    votes: Vec<SignedBallotFact>,
    finished_at: Timestamp,
    is_closed: bool,
}

impl Voteproof {
    /// An empty, unfinished voteproof.
    pub fn new(
        height: Height,
        round: Round,
        stage: Stage,
        suffrages: Vec<Address>,
        threshold_ratio: f64,
    ) -> Self {
        Self {
            hint: hints::VOTEPROOF,
            height,
            round,
            stage,
            result: VoteResult::NotYet,
            threshold_ratio,
            suffrages,
            majority: None,
            facts: Vec::new(),
            votes: Vec::new(),
            finished_at: Timestamp::EPOCH,
            is_closed: false,
        }
    }

    pub fn with_facts(mut self, facts: Vec<Fact>) -> Self {
        self.facts = facts;
        self
    }

    pub fn with_votes(mut self, votes: Vec<SignedBallotFact>) -> Self {
        self.votes = votes;
        self
    }

    /// Record `fact` as the majority and set the result accordingly.
    pub fn with_majority(mut self, fact: Fact) -> Self {
        self.majority = Some(fact);
        self.result = VoteResult::Majority;
        self
    }

    pub fn with_result(mut self, result: VoteResult) -> Self {
        self.result = result;
        self
    }

    pub fn finish(mut self, at: Timestamp) -> Self {
        self.finished_at = at;
        self
    }

    pub fn close(mut self) -> Self {
        self.is_closed = true;
        self
    }

    pub fn hint(&self) -> &Hint {
        &self.hint
    }

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn result(&self) -> VoteResult {
        self.result
    }

    pub fn threshold_ratio(&self) -> f64 {
        self.threshold_ratio
    }

    pub fn suffrages(&self) -> &[Address] {
        &self.suffrages
    }

    pub fn majority(&self) -> Option<&Fact> {
        self.majority.as_ref()
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn votes(&self) -> &[SignedBallotFact] {
        &self.votes
    }

    pub fn finished_at(&self) -> Timestamp {
        self.finished_at
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_finished()
    }

    /// Canonical bytes. Facts are ordered by hash and votes by voter so the
    /// same evidence always hashes the same way. Every field except the hint
    /// is covered, `is_closed` included.
    pub fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + self.facts.len() * Hash::LEN);
        buf.extend_from_slice(&self.height.bytes());
        buf.extend_from_slice(&self.round.bytes());
        buf.extend_from_slice(&self.threshold_ratio.to_bits().to_be_bytes());
        buf.push(self.result.byte());
        buf.push(self.stage.byte());
        if let Some(majority) = &self.majority {
            buf.extend_from_slice(majority.hash().as_bytes());
        }

        let mut fact_hashes: Vec<Hash> = self.facts.iter().map(|f| f.hash()).collect();
        fact_hashes.sort();
        for h in &fact_hashes {
            buf.extend_from_slice(h.as_bytes());
        }

        let mut votes: Vec<&SignedBallotFact> = self.votes.iter().collect();
        votes.sort_by(|a, b| a.node().bytes().cmp(b.node().bytes()));
        for vote in votes {
            buf.extend_from_slice(&vote.bytes());
        }

        for node in &self.suffrages {
            buf.extend_from_slice(node.bytes());
        }
        buf.extend_from_slice(&self.finished_at.bytes());
        buf.push(u8::from(self.is_closed));
        buf
    }

    /// Structural validation. The threshold is not recomputed.
    pub fn is_valid(&self, network_id: &NetworkId) -> Result<(), BallotError> {
        Hint::is_compatible(&self.hint, &hints::VOTEPROOF)?;

        if !self.height.is_valid() {
            return Err(BallotError::Invalid(format!(
                "voteproof height {} below pre-genesis",
                self.height
            )));
        }
        if !self.stage.can_vote() {
            return Err(BallotError::Invalid(format!(
                "voteproof stage {} cannot be voted on",
                self.stage
            )));
        }
        if !(self.threshold_ratio > 0.0 && self.threshold_ratio <= 100.0) {
            return Err(BallotError::Invalid(format!(
                "threshold ratio {} out of (0, 100]",
                self.threshold_ratio
            )));
        }
        if !self.is_finished() {
            return Err(BallotError::NotFinishedVoteproof(format!(
                "{} voteproof at height={} round={}",
                self.stage, self.height, self.round
            )));
        }
        if self.finished_at.is_zero() {
            return Err(BallotError::EmptyField("empty finished_at".into()));
        }

        self.check_suffrages()?;
        let fact_hashes = self.check_facts()?;
        self.check_majority(&fact_hashes)?;
        self.check_votes(&fact_hashes, network_id)
    }

    fn check_suffrages(&self) -> Result<(), BallotError> {
        if self.suffrages.is_empty() {
            return Err(BallotError::EmptyField("empty suffrages".into()));
        }
        let mut seen = HashSet::with_capacity(self.suffrages.len());
        for node in &self.suffrages {
            if !node.is_valid() {
                return Err(BallotError::Invalid(format!("invalid suffrage node {node:?}")));
            }
            if !seen.insert(node) {
                return Err(BallotError::Invalid(format!("duplicate suffrage node {node}")));
            }
        }
        Ok(())
    }

    /// Facts must sit at this voteproof's position.
    fn check_position(&self, fact: &Fact) -> Result<(), BallotError> {
        if fact.stage() != self.stage {
            return Err(BallotError::WrongStage {
                message: "fact stage does not match voteproof".into(),
                expected: self.stage,
                found: fact.stage(),
            });
        }
        if fact.height() != self.height {
            return Err(BallotError::WrongHeight {
                message: "fact height does not match voteproof".into(),
                expected: self.height,
                found: fact.height(),
            });
        }
        if fact.round() != self.round {
            return Err(BallotError::WrongRound {
                message: "fact round does not match voteproof".into(),
                expected: self.round,
                found: fact.round(),
            });
        }
        Ok(())
    }

    fn check_facts(&self) -> Result<HashSet<Hash>, BallotError> {
        if self.facts.is_empty() {
            return Err(BallotError::EmptyField("empty voteproof facts".into()));
        }
        let mut hashes = HashSet::with_capacity(self.facts.len());
        for fact in &self.facts {
            fact.is_valid()?;
            self.check_position(fact)?;
            if !hashes.insert(fact.hash()) {
                return Err(BallotError::Invalid(format!(
                    "duplicate fact {} in voteproof",
                    fact.hash()
                )));
            }
        }
        Ok(hashes)
    }

    fn check_majority(&self, fact_hashes: &HashSet<Hash>) -> Result<(), BallotError> {
        match (&self.majority, self.result) {
            (None, VoteResult::Majority) => {
                Err(BallotError::EmptyField("empty majority with majority result".into()))
            }
            (Some(_), result) if result != VoteResult::Majority => Err(BallotError::Invalid(
                format!("majority fact with {result} result"),
            )),
            (Some(majority), _) => {
                majority.is_valid().map_err(|e| e.context("invalid majority"))?;
                self.check_position(majority)?;
                if !fact_hashes.contains(&majority.hash()) {
                    return Err(BallotError::Invalid(format!(
                        "majority {} not found in facts",
                        majority.hash()
                    )));
                }
                Ok(())
            }
            (None, _) => Ok(()),
        }
    }

    fn check_votes(
        &self,
        fact_hashes: &HashSet<Hash>,
        network_id: &NetworkId,
    ) -> Result<(), BallotError> {
        if self.votes.is_empty() {
            return Err(BallotError::EmptyField("empty voteproof votes".into()));
        }
        let suffrages: HashSet<&Address> = self.suffrages.iter().collect();
        let mut voters = HashSet::with_capacity(self.votes.len());
        let mut voted = HashSet::with_capacity(fact_hashes.len());
        for vote in &self.votes {
            vote.is_valid(network_id)
                .map_err(|e| e.context("invalid vote"))?;
            let node = vote.node();
            if !suffrages.contains(node) {
                return Err(BallotError::Invalid(format!("voter {node} not in suffrages")));
            }
            if !voters.insert(node) {
                return Err(BallotError::Invalid(format!("duplicate vote from {node}")));
            }
            let h = vote.fact().hash();
            if !fact_hashes.contains(&h) {
                return Err(BallotError::Invalid(format!(
                    "fact {h} voted by {node} not found in facts"
                )));
            }
            voted.insert(h);
        }
        if let Some(unvoted) = fact_hashes.iter().find(|h| !voted.contains(*h)) {
            return Err(BallotError::Invalid(format!("fact {unvoted} has no vote")));
        }
        Ok(())
    }
}
