use scoreboard_types::{Direction, MemberName};

use crate::error::LedgerError;

/// A validated request to move one member's total.
///
/// Construction is the input boundary: names must be non-empty and deltas
/// strictly positive and finite. Anything else never reaches the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct DeltaRequest {
    name: MemberName,
    delta: f64,
    direction: Direction,
}

impl DeltaRequest {
    pub fn new(name: &str, delta: f64, direction: Direction) -> Result<Self, LedgerError> {
        let name = MemberName::new(name)?;
        if !delta.is_finite() || delta <= 0.0 {
            return Err(LedgerError::InvalidDelta(delta));
        }
        Ok(Self {
            name,
            delta,
            direction,
        })
    }

    pub fn add(name: &str, delta: f64) -> Result<Self, LedgerError> {
        Self::new(name, delta, Direction::Add)
    }

    pub fn subtract(name: &str, delta: f64) -> Result<Self, LedgerError> {
        Self::new(name, delta, Direction::Subtract)
    }

    pub fn name(&self) -> &MemberName {
        &self.name
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}
