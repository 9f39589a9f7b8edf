use isaac_types::{Height, Round, Stage, TypeError, VoteResult};
use thiserror::Error;

/// Machine-readable category of a [`BallotError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyField,
    InvalidHash,
    InvalidFact,
    SignatureFailure,
    NotFinishedVoteproof,
    WeirdFact,
    WrongStage,
    WrongHeight,
    WrongRound,
    WrongResult,
    Chronology,
    IncompatibleHint,
    Invalid,
    Codec,
    Config,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum BallotError {
    #[error("empty field: {0}")]
    EmptyField(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("invalid fact: {0}")]
    InvalidFact(String),

    #[error("signature failure: {0}")]
    SignatureFailure(String),

    #[error("voteproof not finished: {0}")]
    NotFinishedVoteproof(String),

    #[error("weird fact: {0}")]
    WeirdFact(String),

    #[error("{message}: expected stage {expected}, found {found}")]
    WrongStage {
        message: String,
        expected: Stage,
        found: Stage,
    },

    #[error("{message}: expected height {expected}, found {found}")]
    WrongHeight {
        message: String,
        expected: Height,
        found: Height,
    },

    #[error("{message}: expected round {expected}, found {found}")]
    WrongRound {
        message: String,
        expected: Round,
        found: Round,
    },

    #[error("{message}: expected result {expected}, found {found}")]
    WrongResult {
        message: String,
        expected: VoteResult,
        found: VoteResult,
    },

    #[error("chronology: {0}")]
    Chronology(String),

    #[error("incompatible hint: {0}")]
    IncompatibleHint(String),

    #[error("invalid: {0}")]
    Invalid(String),

    #[error("codec: {0}")]
    Codec(String),

    #[error("config: {0}")]
    Config(String),
}

impl BallotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyField(_) => ErrorKind::EmptyField,
            Self::InvalidHash(_) => ErrorKind::InvalidHash,
            Self::InvalidFact(_) => ErrorKind::InvalidFact,
            Self::SignatureFailure(_) => ErrorKind::SignatureFailure,
            Self::NotFinishedVoteproof(_) => ErrorKind::NotFinishedVoteproof,
            Self::WeirdFact(_) => ErrorKind::WeirdFact,
            Self::WrongStage { .. } => ErrorKind::WrongStage,
            Self::WrongHeight { .. } => ErrorKind::WrongHeight,
            Self::WrongRound { .. } => ErrorKind::WrongRound,
            Self::WrongResult { .. } => ErrorKind::WrongResult,
            Self::Chronology(_) => ErrorKind::Chronology,
            Self::IncompatibleHint(_) => ErrorKind::IncompatibleHint,
            Self::Invalid(_) => ErrorKind::Invalid,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Prefix the message with `context`, keeping the kind and any expected
    /// or found values.
    pub fn context(self, context: &str) -> Self {
        let wrap = |m: String| format!("{context}: {m}");
        match self {
            Self::EmptyField(m) => Self::EmptyField(wrap(m)),
            Self::InvalidHash(m) => Self::InvalidHash(wrap(m)),
            Self::InvalidFact(m) => Self::InvalidFact(wrap(m)),
            Self::SignatureFailure(m) => Self::SignatureFailure(wrap(m)),
            Self::NotFinishedVoteproof(m) => Self::NotFinishedVoteproof(wrap(m)),
            Self::WeirdFact(m) => Self::WeirdFact(wrap(m)),
            Self::WrongStage {
                message,
                expected,
                found,
            } => Self::WrongStage {
                message: wrap(message),
                expected,
                found,
            },
            Self::WrongHeight {
                message,
                expected,
                found,
            } => Self::WrongHeight {
                message: wrap(message),
                expected,
                found,
            },
            Self::WrongRound {
                message,
                expected,
                found,
            } => Self::WrongRound {
                message: wrap(message),
                expected,
                found,
            },
            Self::WrongResult {
                message,
                expected,
                found,
            } => Self::WrongResult {
                message: wrap(message),
                expected,
                found,
            },
            Self::Chronology(m) => Self::Chronology(wrap(m)),
            Self::IncompatibleHint(m) => Self::IncompatibleHint(wrap(m)),
            Self::Invalid(m) => Self::Invalid(wrap(m)),
            Self::Codec(m) => Self::Codec(wrap(m)),
            Self::Config(m) => Self::Config(wrap(m)),
        }
    }
}

impl From<TypeError> for BallotError {
    fn from(e: TypeError) -> Self {
        let message = e.to_string();
        match e {
            TypeError::InvalidHash(_) => Self::InvalidHash(message),
            TypeError::InvalidPublicKey(_) | TypeError::InvalidSignature(_) => {
                Self::SignatureFailure(message)
            }
            TypeError::InvalidHint(_)
            | TypeError::InvalidVersion(_)
            | TypeError::IncompatibleHint(_) => Self::IncompatibleHint(message),
            TypeError::InvalidAddress(_) | TypeError::InvalidTimestamp(_) => Self::Invalid(message),
        }
    }
}
