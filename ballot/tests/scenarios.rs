//! End-to-end ballot scenarios on network "showme".

use isaac_ballot::testing::*;
use isaac_ballot::{decode_ballot, BallotFact, Codec, ErrorKind, JsonCodec, WireFormat};
use isaac_types::{Stage, VoteResult};

// ---------------------------------------------------------------------------
// S1. ACCEPT after an INIT majority at the same position
// ---------------------------------------------------------------------------

#[test]
fn accept_ballot_after_init_majority() {
    let base = voteproof(Stage::Init, 3, 0, VoteResult::Majority);
    let seal = accept_seal(accept_fact(3, 0), base);
    seal.is_valid(&network_id()).expect("valid accept ballot");

    for codec in [WireFormat::Json, WireFormat::Binary] {
        let bytes = codec.encode(&seal).expect("encode");
        let decoded = decode_ballot(&bytes, &codec).expect("decode");
        assert_eq!(decoded, seal);
        assert_eq!(codec.encode(&decoded).expect("re-encode"), bytes);
        decoded.is_valid(&network_id()).expect("decoded seal still valid");
    }
}

// ---------------------------------------------------------------------------
// S2. INIT opening a new height after an ACCEPT majority
// ---------------------------------------------------------------------------

#[test]
fn init_ballot_after_accept_majority() {
    let base = voteproof(Stage::Accept, 3, 0, VoteResult::Majority);
    let seal = init_seal(init_fact(4, 0), base, None);
    seal.is_valid(&network_id()).expect("valid init ballot");
    assert!(seal.accept_voteproof().is_none());
    assert_eq!(
        seal.accept_voteproof_or_base().map(|vp| vp.stage()),
        Some(Stage::Accept)
    );
}

// ---------------------------------------------------------------------------
// S3. INIT after an ACCEPT majority must start at round 0
// ---------------------------------------------------------------------------

#[test]
fn init_ballot_with_non_zero_round_after_accept_majority() {
    let base = voteproof(Stage::Accept, 3, 0, VoteResult::Majority);
    let seal = init_seal(init_fact(4, 33), base, None);
    let err = seal.is_valid(&network_id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongRound);
    assert!(err.to_string().contains("wrong round of init ballot"));
}

// ---------------------------------------------------------------------------
// S4. INIT after an ACCEPT draw needs the previous ACCEPT majority
// ---------------------------------------------------------------------------

#[test]
fn init_ballot_after_accept_draw_without_accept_voteproof() {
    let base = voteproof(Stage::Accept, 2, 0, VoteResult::Draw);
    let seal = init_seal(init_fact(3, 1), base, None);
    let err = seal.is_valid(&network_id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyField);
    assert!(err
        .to_string()
        .contains("empty accept voteproof with draw accept base voteproof"));
}

#[test]
fn init_ballot_after_accept_draw_with_accept_voteproof() {
    let base = voteproof(Stage::Accept, 3, 0, VoteResult::Draw);
    let accept = voteproof(Stage::Accept, 2, 4, VoteResult::Majority);
    let seal = init_seal(init_fact(3, 1), base, Some(accept.clone()));
    seal.is_valid(&network_id()).expect("valid init ballot");
    assert_eq!(seal.accept_voteproof_or_base(), Some(&accept));
}

// ---------------------------------------------------------------------------
// S5. A proposal must be signed by its proposer
// ---------------------------------------------------------------------------

#[test]
fn proposal_signed_by_someone_else() {
    let (a, b) = (node(0), node(1));
    let base = voteproof(Stage::Init, 3, 0, VoteResult::Majority);
    let seal = proposal_seal(proposal_fact(3, 0, &a.address), &b, base);
    let err = seal.is_valid(&network_id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert!(err
        .to_string()
        .contains("proposal fact is not signed by factsign node"));
}

// ---------------------------------------------------------------------------
// S6. Re-signing a proposal later keeps the fact
// ---------------------------------------------------------------------------

#[test]
fn proposal_resigned_later() {
    let proposer = node(0);
    let base = voteproof(Stage::Init, 3, 0, VoteResult::Majority);
    let seal = proposal_seal(proposal_fact(3, 0, &proposer.address), &proposer, base);
    seal.is_valid(&network_id()).expect("valid proposal");
    let t0 = seal.signed_at();
    let fact_hash = seal.fact().hash();

    let validated = seal.validate(&network_id()).expect("validated");
    let resigned = validated.sign_with_fact(proposer.address.clone(), &proposer.keypair, &network_id());

    resigned.is_valid(&network_id()).expect("re-signed proposal valid");
    assert!(resigned.signed_at() > t0);
    assert_eq!(resigned.fact().hash(), fact_hash);

    let bytes = JsonCodec.encode(&resigned).expect("encode");
    assert_eq!(decode_ballot(&bytes, &JsonCodec).expect("decode"), resigned);
}
