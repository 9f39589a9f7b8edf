//! Built-in hints and the stage each ballot-related hint stands for.

use isaac_types::{Hint, HintType, Stage, Version};

const V0_0_1: Version = Version::new(0, 0, 1);

pub const INIT_BALLOT: Hint = Hint::new(HintType::from_static("init-ballot"), V0_0_1);
pub const PROPOSAL: Hint = Hint::new(HintType::from_static("proposal"), V0_0_1);
pub const ACCEPT_BALLOT: Hint = Hint::new(HintType::from_static("accept-ballot"), V0_0_1);

pub const INIT_BALLOT_FACT: Hint = Hint::new(HintType::from_static("init-ballot-fact"), V0_0_1);
pub const PROPOSAL_FACT: Hint = Hint::new(HintType::from_static("proposal-fact"), V0_0_1);
pub const ACCEPT_BALLOT_FACT: Hint =
    Hint::new(HintType::from_static("accept-ballot-fact"), V0_0_1);

pub const BALLOT_FACT_SIGN: Hint = Hint::new(HintType::from_static("ballot-fact-sign"), V0_0_1);
pub const SIGNED_BALLOT_FACT: Hint =
    Hint::new(HintType::from_static("signed-ballot-fact"), V0_0_1);
pub const VOTEPROOF: Hint = Hint::new(HintType::from_static("voteproof"), V0_0_1);

/// Every built-in hint with the name it is registered under.
pub const BUILTIN: [(Hint, &str); 9] = [
    (INIT_BALLOT, "init ballot seal"),
    (PROPOSAL, "proposal seal"),
    (ACCEPT_BALLOT, "accept ballot seal"),
    (INIT_BALLOT_FACT, "init ballot fact"),
    (PROPOSAL_FACT, "proposal fact"),
    (ACCEPT_BALLOT_FACT, "accept ballot fact"),
    (BALLOT_FACT_SIGN, "ballot fact sign"),
    (SIGNED_BALLOT_FACT, "signed ballot fact"),
    (VOTEPROOF, "voteproof"),
];

/// Stage of a seal hint, or `None` if the hint is not a seal hint.
pub fn seal_stage(hint: &Hint) -> Option<Stage> {
    stage_of(hint, [&INIT_BALLOT, &PROPOSAL, &ACCEPT_BALLOT])
}

/// Stage of a fact hint, or `None` if the hint is not a fact hint.
pub fn fact_stage(hint: &Hint) -> Option<Stage> {
    stage_of(hint, [&INIT_BALLOT_FACT, &PROPOSAL_FACT, &ACCEPT_BALLOT_FACT])
}

/// The seal hint used for ballots at `stage`.
pub fn seal_hint_for(stage: Stage) -> Option<Hint> {
    match stage {
        Stage::Init => Some(INIT_BALLOT),
        Stage::Proposal => Some(PROPOSAL),
        Stage::Accept => Some(ACCEPT_BALLOT),
        Stage::Unknown => None,
    }
}

fn stage_of(hint: &Hint, [init, proposal, accept]: [&Hint; 3]) -> Option<Stage> {
    let ty = hint.ty();
    if ty == init.ty() {
        Some(Stage::Init)
    } else if ty == proposal.ty() {
        Some(Stage::Proposal)
    } else if ty == accept.ty() {
        Some(Stage::Accept)
    } else {
        None
    }
}
