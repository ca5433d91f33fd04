/// Errors that can occur while building or consulting the gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The caller did not present the expected code.
    #[error("authorization failed: wrong admin code")]
    Denied,

    /// A code is required but none was configured.
    #[error("admin code required but `{var}` is not set")]
    MissingSecret { var: String },
}
