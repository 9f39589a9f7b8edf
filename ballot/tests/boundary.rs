//! Boundary behaviours of facts and seals.

use isaac_ballot::testing::*;
use isaac_ballot::{
    hints, new_accept_fact, new_init_fact, new_proposal_fact, BallotFact, Codec, ErrorKind,
    Fact, JsonCodec, Seal,
};
use isaac_crypto::random_hash;
use isaac_types::{Hash, Height, Round, Stage, Timestamp, VoteResult};

fn assert_invalid_fact(fact: &Fact) {
    let err = fact.is_valid().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFact, "{err}");
}

#[test]
fn init_fact_with_empty_previous_block() {
    assert_invalid_fact(&new_init_fact(Height::new(3), Round::ZERO, None));
    assert_invalid_fact(&new_init_fact(Height::new(3), Round::ZERO, Hash::ZERO));
}

#[test]
fn accept_fact_with_empty_components() {
    assert_invalid_fact(&new_accept_fact(Height::new(3), Round::ZERO, None, random_hash()));
    assert_invalid_fact(&new_accept_fact(Height::new(3), Round::ZERO, random_hash(), None));
    assert_invalid_fact(&new_accept_fact(Height::new(3), Round::ZERO, Hash::ZERO, random_hash()));
}

#[test]
fn proposal_fact_without_proposer() {
    assert_invalid_fact(&new_proposal_fact(
        Height::new(3),
        Round::ZERO,
        None,
        vec![random_hash()],
        Timestamp::now(),
    ));
}

#[test]
fn proposal_fact_with_duplicate_operation() {
    let op = random_hash();
    assert_invalid_fact(&new_proposal_fact(
        Height::new(3),
        Round::ZERO,
        node(0).address,
        vec![op, op],
        Timestamp::now(),
    ));
}

#[test]
fn fact_with_mutated_hash() {
    let fact = new_accept_fact(Height::new(3), Round::ZERO, random_hash(), random_hash());
    let json = String::from_utf8(JsonCodec.encode(&fact).unwrap()).unwrap();
    let mutated = json.replace(&fact.hash().to_string(), &random_hash().to_string());
    assert_ne!(json, mutated);

    let decoded: Fact = JsonCodec.decode(mutated.as_bytes()).expect("still decodes");
    let err = decoded.is_valid().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFact);
    assert!(err.to_string().contains("hash does not match"));
}

#[test]
fn seal_hint_for_another_stage_is_weird() {
    let n = node(0);
    let base = voteproof(Stage::Init, 3, 0, VoteResult::Majority);
    // An ACCEPT fact under the INIT seal hint.
    let seal = Seal::new(
        hints::INIT_BALLOT,
        accept_fact(3, 0).into(),
        n.address.clone(),
        base,
        None,
        &n.keypair,
        &network_id(),
    )
    .expect("construction does not check stages");
    assert_eq!(seal.stage(), Stage::Init);
    let err = seal.is_valid(&network_id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WeirdFact);
}

#[test]
fn seal_with_foreign_hint_is_rejected() {
    let n = node(0);
    let seal = Seal::new(
        hints::VOTEPROOF,
        accept_fact(3, 0).into(),
        n.address.clone(),
        voteproof(Stage::Init, 3, 0, VoteResult::Majority),
        None,
        &n.keypair,
        &network_id(),
    )
    .unwrap();
    assert_eq!(seal.stage(), Stage::Unknown);
    assert_eq!(
        seal.is_valid(&network_id()).unwrap_err().kind(),
        ErrorKind::IncompatibleHint
    );
}

#[test]
fn seal_signed_for_another_network() {
    let seal = accept_seal(accept_fact(3, 0), voteproof(Stage::Init, 3, 0, VoteResult::Majority));
    let err = seal.is_valid(&"other".into()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureFailure);
}

#[test]
fn unfinished_base_voteproof() {
    let base = voteproof(Stage::Init, 3, 0, VoteResult::Majority).with_result(VoteResult::NotYet);
    let seal = accept_seal(accept_fact(3, 0), base);
    let err = seal.is_valid(&network_id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFinishedVoteproof);
    assert!(err.to_string().contains("base voteproof"));
}

#[test]
fn init_right_after_genesis() {
    let base = voteproof(Stage::Accept, Height::GENESIS.value(), 0, VoteResult::Majority);
    let seal = init_seal(init_fact(Height::GENESIS.next().value(), 0), base, None);
    seal.is_valid(&network_id()).expect("init ballot after genesis");
}

#[test]
fn facts_at_pre_genesis_are_rejected() {
    assert_invalid_fact(&new_init_fact(Height::PRE_GENESIS, Round::ZERO, random_hash()));
    assert_invalid_fact(&new_init_fact(Height::NIL, Round::ZERO, random_hash()));
}
