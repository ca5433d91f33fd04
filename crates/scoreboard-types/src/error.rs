use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("member name must not be empty")]
    EmptyName,

    #[error("unknown direction: {0} (expected `add` or `subtract`)")]
    UnknownDirection(String),

    #[error("unknown unit: {0} (expected `points` or `minutes`)")]
    UnknownUnit(String),
}
