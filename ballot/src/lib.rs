//! Ballot core of the ISAAC+ consensus protocol.
//!
//! Builds, signs, encodes and validates the three ballot families (INIT,
//! Proposal, ACCEPT). A ballot is a [`Seal`] around a [`SignedBallotFact`]
//! and the [`Voteproof`]s that justify it. [`Seal::is_valid`] checks both
//! signatures and the cross-stage rules tying the fact's height and round to
//! its voteproofs; [`decode_ballot`] turns wire bytes back into a seal.
//!
//! Everything here is immutable once built and free of I/O, so validation
//! can run on any thread.

pub mod codec;
pub mod config;
pub mod error;
pub mod fact;
pub mod fact_sign;
pub mod hints;
pub mod registry;
pub mod seal;
pub mod signed_fact;
mod validation;
pub mod voteproof;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

pub use codec::{decode_ballot, BinaryCodec, Codec, JsonCodec, WireFormat};
pub use config::BallotConfig;
pub use error::{BallotError, ErrorKind};
pub use fact::{
    new_accept_fact, new_init_fact, new_proposal_fact, AcceptFact, BallotFact, Fact, InitFact,
    ProposalFact,
};
pub use fact_sign::FactSign;
pub use registry::{HintRegistry, REGISTRY};
pub use seal::{Seal, ValidatedSeal};
pub use signed_fact::SignedBallotFact;
pub use voteproof::Voteproof;
