//! Consensus stages and vote outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a consensus round. A height advances INIT -> Proposal -> ACCEPT.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Stage {
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "INIT")]
    Init,
    #[serde(rename = "PROPOSAL")]
    Proposal,
    #[serde(rename = "ACCEPT")]
    Accept,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Init => "INIT",
            Self::Proposal => "PROPOSAL",
            Self::Accept => "ACCEPT",
        }
    }

    /// Only INIT and ACCEPT stages are voted on by the whole suffrage.
    pub fn can_vote(&self) -> bool {
        matches!(self, Self::Init | Self::Accept)
    }

    pub fn byte(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Init => 1,
            Self::Proposal => 2,
            Self::Accept => 3,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a voteproof.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteResult {
    #[default]
    #[serde(rename = "NOT-YET")]
    NotYet,
    #[serde(rename = "DRAW")]
    Draw,
    #[serde(rename = "MAJORITY")]
    Majority,
}

impl VoteResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotYet => "NOT-YET",
            Self::Draw => "DRAW",
            Self::Majority => "MAJORITY",
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::NotYet)
    }

    pub fn byte(&self) -> u8 {
        match self {
            Self::NotYet => 0,
            Self::Draw => 1,
            Self::Majority => 2,
        }
    }
}

impl fmt::Display for VoteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
