use thiserror::Error;

/// Every way a request to the engine can be refused.
///
/// Strategy lookups never produce one of these: an unmatched situation always
/// falls back to a defined action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    #[error("invalid rank: {0:?}")]
    InvalidRank(String),
    #[error("cannot split: {0}")]
    InvalidSplit(String),
    #[error("invalid card state: {0}")]
    InvalidCardState(String),
    #[error("invalid rules: {0}")]
    InvalidRules(String),
    #[error("index plays `{first}` and `{second}` cover the same situation")]
    OverlappingIndexPlays { first: String, second: String },
    #[error("{operation} is only allowed in {allowed} phase")]
    WrongPhase {
        operation: &'static str,
        allowed: &'static str,
    },
    #[error("seat `{0}` not found")]
    UnknownSeat(String),
    #[error("seat `{0}` already exists")]
    DuplicateSeat(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
