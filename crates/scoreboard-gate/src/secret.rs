use std::fmt;

use subtle::ConstantTimeEq;

/// The shared admin code.
///
/// `Debug` never prints the value.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wrap a code. Returns `None` for an empty code, which would let blank
    /// input through.
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Exact, constant-time comparison against a caller-supplied code.
    pub fn matches(&self, provided: &str) -> bool {
        self.0.as_bytes().ct_eq(provided.as_bytes()).into()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}
