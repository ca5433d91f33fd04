use scoreboard_gate::GateError;
use scoreboard_store::StoreError;
use scoreboard_types::TypeError;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] GateError),

    #[error("unknown member: {0}")]
    UnknownMember(String),

    #[error("invalid member name: {0}")]
    InvalidName(#[from] TypeError),

    #[error("delta must be a positive, finite number (got {0})")]
    InvalidDelta(f64),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The session was loaded from fallback data; writing it would replace
    /// the stored table.
    #[error("store unreadable at load ({0}); reload before making changes")]
    StoreUnreadable(String),
}

impl LedgerError {
    /// Returns `true` for errors caused by caller input rather than the
    /// environment.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::UnknownMember(_) | Self::InvalidName(_) | Self::InvalidDelta(_)
        )
    }
}
