//! Error taxonomy. Every variant here is meant to cross the engine
//! boundary; nothing is ever swallowed internally.

/// All errors `search_journeys` and the index builder can surface.
///
/// `IndexError` is the exception to "the caller did something wrong": it
/// marks a timetable invariant violated at query or build time, which the
/// caller should treat as a bug rather than a 4xx.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown stop code: {0}")]
    UnknownStop(String),

    #[error("no routes found for this query")]
    NoRoutes,

    #[error("invalid service date: {0}")]
    InvalidDate(String),

    #[error("invalid departure time: {0}")]
    InvalidTime(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("timetable invariant violated: {0}")]
    IndexError(String),

    #[error("search cancelled")]
    Cancelled,
}

pub type EngineResult<T> = Result<T, EngineError>;
