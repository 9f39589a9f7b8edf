//! Seal validation: universal checks, then the cross-stage voteproof rules.
//!
//! Validation is fail-fast and side-effect free. The order is:
//! 1. the signed fact (fact invariants and fact signature)
//! 2. body hash, seal hash and seal signature
//! 3. attached voteproofs are finished and structurally valid
//! 4. the seal hint names the same stage as the fact
//! 5. chronology (the seal post-dates its fact signature, except proposals)
//! 6. stage-specific rules relating the fact to its voteproofs

use isaac_crypto::verify_signature;
use isaac_types::{Height, NetworkId, Round, Stage, VoteResult};

use crate::error::BallotError;
use crate::fact::{BallotFact, Fact, ProposalFact};
use crate::hints;
use crate::registry::REGISTRY;
use crate::seal::{seal_signable, Seal};
use crate::voteproof::Voteproof;

impl Seal {
    pub fn is_valid(&self, network_id: &NetworkId) -> Result<(), BallotError> {
        let _span = tracing::trace_span!(
            "seal_is_valid",
            hint = %self.hint(),
            height = %self.height(),
            round = %self.round(),
        )
        .entered();

        let result = check_seal(self, network_id);
        match &result {
            Ok(()) => tracing::trace!(hash = %self.hash(), "seal accepted"),
            Err(e) => tracing::trace!(kind = ?e.kind(), error = %e, "seal rejected"),
        }
        result
    }
}

fn check_seal(seal: &Seal, network_id: &NetworkId) -> Result<(), BallotError> {
    REGISTRY.resolve(seal.hint())?;
    let seal_stage = hints::seal_stage(seal.hint()).ok_or_else(|| {
        BallotError::IncompatibleHint(format!("{} is not a ballot hint", seal.hint()))
    })?;

    seal.signed_fact()
        .is_valid(network_id)
        .map_err(|e| e.context("invalid signed fact"))?;

    check_signature(seal, network_id)?;

    check_voteproof(seal.base_voteproof(), network_id).map_err(|e| e.context("base voteproof"))?;
    if let Some(accept) = seal.accept_voteproof() {
        check_voteproof(accept, network_id).map_err(|e| e.context("accept voteproof"))?;
    }

    let fact = seal.fact();
    if fact.stage() != seal_stage {
        return Err(BallotError::WeirdFact(format!(
            "{} seal carries a {} fact",
            seal_stage,
            fact.stage()
        )));
    }

    if seal_stage != Stage::Proposal && seal.signed_at() < seal.fact_sign().signed_at() {
        return Err(BallotError::Chronology(format!(
            "seal signed at {} before its fact at {}",
            seal.signed_at(),
            seal.fact_sign().signed_at()
        )));
    }

    match fact {
        Fact::Init(_) => check_init(seal),
        Fact::Proposal(proposal) => {
            check_after_init(seal)?;
            check_proposal(seal, proposal)
        }
        Fact::Accept(_) => check_after_init(seal),
    }
}

fn check_signature(seal: &Seal, network_id: &NetworkId) -> Result<(), BallotError> {
    let body_hash = isaac_crypto::sha256(&seal.body_bytes());
    if body_hash != seal.body_hash() {
        return Err(BallotError::InvalidHash(format!(
            "body hash does not match; stored={} recomputed={body_hash}",
            seal.body_hash()
        )));
    }
    let hash = seal.compute_hash();
    if hash != seal.hash() {
        return Err(BallotError::InvalidHash(format!(
            "seal hash does not match; stored={} recomputed={hash}",
            seal.hash()
        )));
    }
    if seal.signed_at().is_zero() {
        return Err(BallotError::EmptyField("empty seal signed_at".into()));
    }
    if !verify_signature(
        &seal_signable(&seal.body_hash(), network_id),
        seal.signature(),
        seal.signer(),
    ) {
        return Err(BallotError::SignatureFailure(format!(
            "seal signature by {} does not verify",
            seal.signer()
        )));
    }
    Ok(())
}

fn check_voteproof(vp: &Voteproof, network_id: &NetworkId) -> Result<(), BallotError> {
    if !vp.is_finished() {
        return Err(BallotError::NotFinishedVoteproof(format!(
            "{} voteproof at height={} round={} is {}",
            vp.stage(),
            vp.height(),
            vp.round(),
            vp.result()
        )));
    }
    vp.is_valid(network_id)
}

/// Proposal and ACCEPT ballots follow an INIT majority at the same position.
fn check_after_init(seal: &Seal) -> Result<(), BallotError> {
    let stage = seal.stage();
    if seal.accept_voteproof().is_some() {
        return Err(BallotError::Invalid(format!(
            "not empty accept voteproof with {stage} ballot"
        )));
    }

    let base = seal.base_voteproof();
    expect_stage(base, Stage::Init, &format!("wrong stage of base voteproof for {stage} ballot"))?;
    expect_result(
        base,
        VoteResult::Majority,
        &format!("wrong result of base voteproof for {stage} ballot"),
    )?;
    expect_height(
        base.height(),
        seal.height(),
        &format!("wrong height of {stage} ballot"),
    )?;
    expect_round(base.round(), seal.round(), &format!("wrong round of {stage} ballot"))
}

fn check_proposal(seal: &Seal, fact: &ProposalFact) -> Result<(), BallotError> {
    if fact.proposer() != Some(seal.node()) {
        return Err(BallotError::Invalid(format!(
            "proposal fact is not signed by factsign node; proposer={:?} node={}",
            fact.proposer().map(|p| p.as_str()),
            seal.node()
        )));
    }
    if seal.signed_at() < fact.proposed_at() {
        return Err(BallotError::Chronology(format!(
            "proposal seal signed at {} before proposed_at {}",
            seal.signed_at(),
            fact.proposed_at()
        )));
    }
    Ok(())
}

/// An INIT ballot either opens a new height right after an ACCEPT majority,
/// or moves to the next round after an INIT voteproof or an ACCEPT draw at
/// the same height. In the second case it must also carry the ACCEPT
/// majority that finalized the previous height.
fn check_init(seal: &Seal) -> Result<(), BallotError> {
    let base = seal.base_voteproof();
    let accept = seal.accept_voteproof();

    match (base.stage(), base.result()) {
        (Stage::Accept, VoteResult::Majority) => {
            if accept.is_some() {
                return Err(BallotError::Invalid(
                    "not empty accept voteproof with base voteproof".into(),
                ));
            }
            let next = base.height().checked_next().ok_or_else(|| BallotError::WrongHeight {
                message: "wrong height of init ballot; base voteproof is at the last height"
                    .into(),
                expected: base.height(),
                found: seal.height(),
            })?;
            expect_height(next, seal.height(), "wrong height of init ballot")?;
            expect_round(Round::ZERO, seal.round(), "wrong round of init ballot")
        }
        (Stage::Accept, VoteResult::Draw) => {
            let accept = accept.ok_or_else(|| {
                BallotError::EmptyField(
                    "empty accept voteproof with draw accept base voteproof".into(),
                )
            })?;
            expect_next_round(seal, base)?;
            check_init_accept_voteproof(seal, accept)
        }
        (Stage::Accept, result) => Err(BallotError::WrongResult {
            message: "wrong result of accept base voteproof".into(),
            expected: VoteResult::Majority,
            found: result,
        }),
        (Stage::Init, _) => {
            let accept = accept.ok_or_else(|| {
                BallotError::EmptyField("empty accept voteproof with init base voteproof".into())
            })?;
            expect_next_round(seal, base)?;
            check_init_accept_voteproof(seal, accept)
        }
        (found, _) => Err(BallotError::WrongStage {
            message: "wrong stage of base voteproof for init ballot".into(),
            expected: Stage::Accept,
            found,
        }),
    }
}

fn expect_next_round(seal: &Seal, base: &Voteproof) -> Result<(), BallotError> {
    expect_height(base.height(), seal.height(), "wrong height of init ballot")?;
    let next = base.round().checked_next().ok_or_else(|| BallotError::WrongRound {
        message: "wrong round of init ballot; base voteproof is at the last round".into(),
        expected: base.round(),
        found: seal.round(),
    })?;
    expect_round(next, seal.round(), "wrong round of init ballot")
}

fn check_init_accept_voteproof(seal: &Seal, accept: &Voteproof) -> Result<(), BallotError> {
    expect_stage(accept, Stage::Accept, "wrong stage of accept voteproof")?;
    expect_result(accept, VoteResult::Majority, "wrong result of accept voteproof")?;
    expect_height(
        seal.height().prev(),
        accept.height(),
        "wrong height of accept voteproof",
    )
}

fn expect_stage(vp: &Voteproof, expected: Stage, message: &str) -> Result<(), BallotError> {
    if vp.stage() != expected {
        return Err(BallotError::WrongStage {
            message: message.into(),
            expected,
            found: vp.stage(),
        });
    }
    Ok(())
}

fn expect_result(vp: &Voteproof, expected: VoteResult, message: &str) -> Result<(), BallotError> {
    if vp.result() != expected {
        return Err(BallotError::WrongResult {
            message: message.into(),
            expected,
            found: vp.result(),
        });
    }
    Ok(())
}

fn expect_height(expected: Height, found: Height, message: &str) -> Result<(), BallotError> {
    if expected != found {
        return Err(BallotError::WrongHeight {
            message: message.into(),
            expected,
            found,
        });
    }
    Ok(())
}

fn expect_round(expected: Round, found: Round, message: &str) -> Result<(), BallotError> {
    if expected != found {
        return Err(BallotError::WrongRound {
            message: message.into(),
            expected,
            found,
        });
    }
    Ok(())
}
