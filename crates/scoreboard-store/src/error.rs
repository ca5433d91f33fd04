/// Errors from table store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored table cannot be decoded.
    #[error("malformed table at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The backend cannot be reached or is in an unusable state.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
