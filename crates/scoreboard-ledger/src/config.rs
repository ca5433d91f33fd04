use serde::{Deserialize, Serialize};

use scoreboard_types::MemberName;

/// What to do when persisting the ledger fails after a mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteFailurePolicy {
    /// Return the error and roll the in-memory change back.
    #[default]
    Surface,
    /// Log a warning and keep the in-memory change.
    Swallow,
}

/// Configuration for a scoreboard session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Members seeded into an empty store, in display order.
    pub roster: Vec<MemberName>,
    pub on_write_failure: WriteFailurePolicy,
}

impl SessionConfig {
    pub fn with_roster(roster: Vec<MemberName>) -> Self {
        Self {
            roster,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_surface_write_failures() {
        let config = SessionConfig::default();
        assert!(config.roster.is_empty());
        assert_eq!(config.on_write_failure, WriteFailurePolicy::Surface);
    }

    #[test]
    fn toml_round_trip() {
        let config: SessionConfig =
            toml::from_str("roster = [\"Alice\", \"Bob\"]\non_write_failure = \"swallow\"").unwrap();
        assert_eq!(config.roster.len(), 2);
        assert_eq!(config.on_write_failure, WriteFailurePolicy::Swallow);

        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<SessionConfig>(&text).unwrap(), config);
    }

    #[test]
    fn blank_roster_entries_are_rejected() {
        assert!(toml::from_str::<SessionConfig>("roster = [\"Alice\", \" \"]").is_err());
    }
}
