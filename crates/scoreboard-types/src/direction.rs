use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::record::sanitize_total;

/// Which way a delta moves a member's total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Award points or log time.
    Add,
    /// Redeem points; the result is clamped at zero.
    Subtract,
}

impl Direction {
    /// Apply `delta` to `current` in this direction and clamp at zero.
    pub fn apply(self, current: f64, delta: f64) -> f64 {
        let raw = match self {
            Self::Add => current + delta,
            Self::Subtract => current - delta,
        };
        if raw == f64::INFINITY {
            return f64::MAX;
        }
        sanitize_total(raw)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Subtract => f.write_str("subtract"),
        }
    }
}

impl FromStr for Direction {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(Self::Add),
            "subtract" | "sub" | "redeem" | "-" => Ok(Self::Subtract),
            other => Err(TypeError::UnknownDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates() {
        assert_eq!(Direction::Add.apply(10.0, 5.0), 15.0);
    }

    #[test]
    fn subtract_clamps_at_zero() {
        assert_eq!(Direction::Subtract.apply(10.0, 15.0), 0.0);
        assert_eq!(Direction::Subtract.apply(10.0, 4.0), 6.0);
    }

    #[test]
    fn overflow_saturates_instead_of_resetting() {
        assert_eq!(Direction::Add.apply(f64::MAX, f64::MAX), f64::MAX);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("add".parse::<Direction>().unwrap(), Direction::Add);
        assert_eq!("Redeem".parse::<Direction>().unwrap(), Direction::Subtract);
        assert!("multiply".parse::<Direction>().is_err());
        assert_eq!(Direction::Subtract.to_string(), "subtract");
    }
}
