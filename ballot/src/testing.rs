//! Fixtures shared by unit and integration tests: a three-node suffrage on
//! network "showme" and real, signed voteproofs for any position.
//!
//! Compiled for this crate's own tests and behind the `test-fixtures`
//! feature for everything else.

use isaac_crypto::{derive_address, keypair_from_seed, random_hash};
use isaac_types::{Address, Height, KeyPair, NetworkId, Round, Stage, Timestamp, VoteResult};

use crate::fact::{new_accept_fact, new_init_fact, AcceptFact, Fact, InitFact, ProposalFact};
use crate::seal::Seal;
use crate::signed_fact::SignedBallotFact;
use crate::voteproof::Voteproof;

pub const NETWORK: &str = "showme";
pub const THRESHOLD: f64 = 67.0;

pub fn network_id() -> NetworkId {
    NetworkId::from(NETWORK)
}

pub struct Node {
    pub address: Address,
    pub keypair: KeyPair,
}

impl Node {
    pub fn new(i: u8) -> Self {
        let keypair = keypair_from_seed(&[i.wrapping_add(1); 32]);
        let address = derive_address(&keypair.public).expect("derived address is well-formed");
        Self { address, keypair }
    }
}

pub fn node(i: u8) -> Node {
    Node::new(i)
}

pub fn suffrage() -> Vec<Node> {
    (0..3).map(Node::new).collect()
}

fn voting_fact(stage: Stage, height: Height, round: Round) -> Fact {
    match stage {
        Stage::Init => new_init_fact(height, round, random_hash()),
        _ => new_accept_fact(height, round, random_hash(), random_hash()),
    }
}

/// A finished, closed voteproof at `(stage, height, round)`. Majority: every
/// node votes the same fact. Draw: each node votes a different fact.
pub fn voteproof(stage: Stage, height: i64, round: u64, result: VoteResult) -> Voteproof {
    voteproof_with(stage, height, round, result, THRESHOLD, Timestamp::now())
}

/// [`voteproof`] with an explicit threshold and finish time.
pub fn voteproof_with(
    stage: Stage,
    height: i64,
    round: u64,
    result: VoteResult,
    threshold_ratio: f64,
    finished_at: Timestamp,
) -> Voteproof {
    let (height, round) = (Height::new(height), Round::new(round));
    let nodes = suffrage();
    let facts: Vec<Fact> = match result {
        VoteResult::Majority => vec![voting_fact(stage, height, round)],
        _ => nodes.iter().map(|_| voting_fact(stage, height, round)).collect(),
    };
    let votes = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let fact = facts[i % facts.len()].clone();
            SignedBallotFact::new(fact, n.address.clone(), &n.keypair, &network_id())
        })
        .collect();

    let vp = Voteproof::new(
        height,
        round,
        stage,
        nodes.iter().map(|n| n.address.clone()).collect(),
        threshold_ratio,
    )
    .with_facts(facts.clone())
    .with_votes(votes);
    let vp = match result {
        VoteResult::Majority => vp.with_majority(facts[0].clone()),
        other => vp.with_result(other),
    };
    vp.finish(finished_at).close()
}

pub fn init_majority_voteproof(height: Height, round: Round) -> Voteproof {
    voteproof(Stage::Init, height.value(), round.value(), VoteResult::Majority)
}

pub fn accept_majority_voteproof(height: Height, round: Round) -> Voteproof {
    voteproof(Stage::Accept, height.value(), round.value(), VoteResult::Majority)
}

pub fn init_fact(height: i64, round: u64) -> InitFact {
    InitFact::new(Height::new(height), Round::new(round), random_hash())
}

pub fn accept_fact(height: i64, round: u64) -> AcceptFact {
    AcceptFact::new(Height::new(height), Round::new(round), random_hash(), random_hash())
}

pub fn proposal_fact(height: i64, round: u64, proposer: &Address) -> ProposalFact {
    ProposalFact::new(
        Height::new(height),
        Round::new(round),
        proposer.clone(),
        vec![random_hash(), random_hash()],
        Timestamp::now(),
    )
}

pub fn init_seal(fact: InitFact, base: Voteproof, accept: Option<Voteproof>) -> Seal {
    let n = node(0);
    Seal::new_init(fact, n.address, base, accept, &n.keypair, &network_id()).expect("init seal")
}

pub fn proposal_seal(fact: ProposalFact, signer: &Node, base: Voteproof) -> Seal {
    Seal::new_proposal(fact, signer.address.clone(), base, &signer.keypair, &network_id())
        .expect("proposal seal")
}

pub fn accept_seal(fact: AcceptFact, base: Voteproof) -> Seal {
    let n = node(0);
    Seal::new_accept(fact, n.address, base, &n.keypair, &network_id()).expect("accept seal")
}
