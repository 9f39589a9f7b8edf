use proptest::prelude::*;

use isaac_ballot::testing::*;
use isaac_ballot::fact_sign::fact_signable;
use isaac_ballot::seal::seal_signable;
use isaac_ballot::{
    decode_ballot, new_accept_fact, new_init_fact, new_proposal_fact, BallotFact, Codec,
    ProposalFact, Seal, WireFormat,
};
use isaac_crypto::{sha256, verify_signature};
use isaac_types::{Hash, Height, Round, Stage, Timestamp, VoteResult};

fn non_zero_hash() -> impl Strategy<Value = Hash> {
    prop::array::uniform32(0u8..).prop_map(|mut bytes| {
        bytes[0] |= 1;
        Hash::new(bytes)
    })
}

fn position() -> impl Strategy<Value = (Height, Round)> {
    (0i64..1_000_000, 0u64..64).prop_map(|(h, r)| (Height::new(h), Round::new(r)))
}

proptest! {
    /// A fact's stored hash is always the digest of its canonical bytes.
    #[test]
    fn fact_hash_is_digest_of_bytes(
        (height, round) in position(),
        a in non_zero_hash(),
        b in non_zero_hash(),
        ops in prop::collection::hash_set(non_zero_hash(), 1..8),
        proposed_at in 1u64..u64::MAX,
    ) {
        let facts = [
            new_init_fact(height, round, a),
            new_accept_fact(height, round, a, b),
            new_proposal_fact(
                height,
                round,
                node(0).address,
                ops.into_iter().collect(),
                Timestamp::from_nanos(proposed_at),
            ),
        ];
        for fact in &facts {
            prop_assert_eq!(fact.hash(), sha256(&fact.bytes()));
            prop_assert!(fact.is_valid().is_ok());
        }
    }

    /// Changing any component changes the hash.
    #[test]
    fn fact_hash_tracks_components(
        (height, round) in position(),
        a in non_zero_hash(),
        b in non_zero_hash(),
    ) {
        prop_assume!(a != b);
        let one = new_accept_fact(height, round, a, b);
        let swapped = new_accept_fact(height, round, b, a);
        let later = new_accept_fact(height.next(), round, a, b);
        prop_assert_ne!(one.hash(), swapped.hash());
        prop_assert_ne!(one.hash(), later.hash());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Both signatures of a valid seal verify over `hash ‖ network id`, and
    /// the seal survives both wire formats unchanged.
    #[test]
    fn valid_seal_signatures_verify(height in 1i64..100_000, round in 0u64..16) {
        let base = voteproof(Stage::Init, height, round, VoteResult::Majority);
        let seal = accept_seal(accept_fact(height, round), base);
        prop_assert!(seal.is_valid(&network_id()).is_ok());

        let nid = network_id();
        prop_assert!(verify_signature(
            &seal_signable(&seal.body_hash(), &nid),
            seal.signature(),
            seal.signer(),
        ));
        let fact_sign = seal.fact_sign();
        prop_assert!(verify_signature(
            &fact_signable(&seal.fact().hash(), &nid),
            fact_sign.signature(),
            fact_sign.signer(),
        ));

        for format in [WireFormat::Json, WireFormat::Binary] {
            let bytes = format.encode(&seal).unwrap();
            let decoded = decode_ballot(&bytes, &format).unwrap();
            prop_assert_eq!(format.encode(&decoded).unwrap(), bytes);
        }
    }

    /// Re-signing keeps the fact and moves both signatures forward in time.
    #[test]
    fn resigning_preserves_fact_hash(height in 1i64..100_000, signer in 0u8..3) {
        let base = voteproof(Stage::Init, height, 0, VoteResult::Majority);
        let seal = accept_seal(accept_fact(height, 0), base);
        let before = seal.fact().hash();
        let old_signed_at = seal.signed_at();

        let n = node(signer);
        let mut resigned = seal.clone();
        resigned.sign_with_fact(n.address.clone(), &n.keypair, &network_id());

        prop_assert_eq!(resigned.fact().hash(), before);
        prop_assert!(resigned.fact_sign().signed_at() > old_signed_at);
        prop_assert!(resigned.signed_at() > resigned.fact_sign().signed_at());
        prop_assert_eq!(resigned.node(), &n.address);
        prop_assert!(resigned.is_valid(&network_id()).is_ok());
    }
}

/// How a generated ballot is justified.
#[derive(Clone, Copy, Debug)]
enum Shape {
    InitAfterAccept,
    InitNextRound,
    Proposal,
    Accept,
}

fn shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::InitAfterAccept),
        Just(Shape::InitNextRound),
        Just(Shape::Proposal),
        Just(Shape::Accept),
    ]
}

fn threshold() -> impl Strategy<Value = f64> {
    1e-9f64..=100.0
}

fn instant() -> impl Strategy<Value = Timestamp> {
    (1u64..u64::MAX).prop_map(Timestamp::from_nanos)
}

fn build_seal(
    shape: Shape,
    height: i64,
    round: u64,
    thresholds: (f64, f64),
    finished: (Timestamp, Timestamp),
    ops: Vec<Hash>,
    proposed_at: Timestamp,
) -> Seal {
    let vp = |stage, h, r, result, i: usize| {
        let (t, f) = if i == 0 {
            (thresholds.0, finished.0)
        } else {
            (thresholds.1, finished.1)
        };
        voteproof_with(stage, h, r, result, t, f)
    };
    match shape {
        Shape::InitAfterAccept => init_seal(
            init_fact(height, 0),
            vp(Stage::Accept, height - 1, round, VoteResult::Majority, 0),
            None,
        ),
        Shape::InitNextRound => init_seal(
            init_fact(height, round + 1),
            vp(Stage::Init, height, round, VoteResult::Draw, 0),
            Some(vp(Stage::Accept, height - 1, 0, VoteResult::Majority, 1)),
        ),
        Shape::Proposal => {
            let proposer = node(1);
            let fact = ProposalFact::new(
                Height::new(height),
                Round::new(round),
                proposer.address.clone(),
                ops,
                proposed_at,
            );
            proposal_seal(fact, &proposer, vp(Stage::Init, height, round, VoteResult::Majority, 0))
        }
        Shape::Accept => accept_seal(
            accept_fact(height, round),
            vp(Stage::Init, height, round, VoteResult::Majority, 0),
        ),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any valid seal decodes back to itself and re-encodes to the same
    /// bytes in both wire formats.
    #[test]
    fn seal_wire_roundtrip(
        shape in shape(),
        height in 1i64..1_000_000,
        round in 0u64..1_000,
        thresholds in (threshold(), threshold()),
        finished in (instant(), instant()),
        ops in prop::collection::vec(non_zero_hash(), 1..8),
        proposed_at in 1u64..1_600_000_000_000_000_000,
    ) {
        let mut ops = ops;
        ops.sort();
        ops.dedup();
        let seal = build_seal(
            shape,
            height,
            round,
            thresholds,
            finished,
            ops,
            Timestamp::from_nanos(proposed_at),
        );
        prop_assert!(seal.is_valid(&network_id()).is_ok());

        for format in [WireFormat::Json, WireFormat::Binary] {
            let bytes = format.encode(&seal).unwrap();
            let decoded = decode_ballot(&bytes, &format).unwrap();
            prop_assert_eq!(&decoded, &seal);
            prop_assert_eq!(format.encode(&decoded).unwrap(), bytes);
            prop_assert!(
                decoded.is_valid(&network_id()).is_ok(),
                "{:?} seal invalid after {} round trip",
                shape,
                format
            );
        }
    }
}
