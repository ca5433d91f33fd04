use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A roster entry.
///
/// Names are compared exactly after trimming surrounding whitespace; an empty
/// name is never a valid member.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberName(String);

impl MemberName {
    /// Validate and wrap a member name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MemberName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MemberName> for String {
    fn from(name: MemberName) -> Self {
        name.0
    }
}

impl AsRef<str> for MemberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberName({:?})", self.0)
    }
}

/// Coerce a raw total into the ledger's domain.
///
/// NaN, infinities and negative values all become `0.0`.
pub fn sanitize_total(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

/// One ledger row: a member and their accumulated total.
///
/// The total is never negative; every constructor and mutator goes through
/// [`sanitize_total`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    name: MemberName,
    total: f64,
}

impl Record {
    pub fn new(name: MemberName, total: f64) -> Self {
        Self {
            name,
            total: sanitize_total(total),
        }
    }

    /// A record with a zero total, as seeded from the roster.
    pub fn zero(name: MemberName) -> Self {
        Self { name, total: 0.0 }
    }

    pub fn name(&self) -> &MemberName {
        &self.name
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Replace the total, clamping it at zero.
    pub fn set_total(&mut self, total: f64) {
        self.total = sanitize_total(total);
    }
}
