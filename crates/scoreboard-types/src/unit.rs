use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// What a total counts.
///
/// The unit only affects the store's column header and how totals are
/// rendered; the ledger itself treats every total as a plain number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Points,
    /// Logged minutes, displayed as hours and minutes.
    Minutes,
}

impl Unit {
    /// Header of the numeric column in the backing table.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Points => "Total Points",
            Self::Minutes => "Total Minutes",
        }
    }

    /// Human-readable rendering of a total.
    pub fn format_total(self, total: f64) -> String {
        match self {
            // Points are shown truncated to whole numbers.
            Self::Points => format!("{} Points", total.max(0.0).trunc() as u64),
            Self::Minutes => {
                let minutes = total.max(0.0).round() as u64;
                format!("{}h {}m", minutes / 60, minutes % 60)
            }
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Points => f.write_str("points"),
            Self::Minutes => f.write_str("minutes"),
        }
    }
}

impl FromStr for Unit {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" => Ok(Self::Points),
            "minutes" => Ok(Self::Minutes),
            other => Err(TypeError::UnknownUnit(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        assert_eq!(Unit::Points.column_name(), "Total Points");
        assert_eq!(Unit::Minutes.column_name(), "Total Minutes");
    }

    #[test]
    fn points_are_truncated() {
        assert_eq!(Unit::Points.format_total(0.0), "0 Points");
        assert_eq!(Unit::Points.format_total(12.9), "12 Points");
    }

    #[test]
    fn minutes_split_into_hours() {
        assert_eq!(Unit::Minutes.format_total(0.0), "0h 0m");
        assert_eq!(Unit::Minutes.format_total(125.0), "2h 5m");
        assert_eq!(Unit::Minutes.format_total(59.6), "1h 0m");
    }

    #[test]
    fn parse_unit() {
        assert_eq!("Minutes".parse::<Unit>().unwrap(), Unit::Minutes);
        assert_eq!(
            "hours".parse::<Unit>().unwrap_err(),
            TypeError::UnknownUnit("hours".into())
        );
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Unit::Minutes).unwrap(), "\"minutes\"");
    }
}
