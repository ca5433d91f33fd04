use serde::{Deserialize, Serialize};

/// Environment variable the admin code is read from by default.
pub const DEFAULT_CODE_ENV: &str = "SCOREBOARD_ADMIN_CODE";

/// Whether mutations require the shared code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Required,
    Disabled,
}

/// Configuration for the access gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub mode: AuthMode,
    /// Name of the environment variable holding the admin code.
    pub code_env: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::Required,
            code_env: DEFAULT_CODE_ENV.into(),
        }
    }
}

impl GateConfig {
    /// A configuration that lets every mutation through.
    pub fn disabled() -> Self {
        Self {
            mode: AuthMode::Disabled,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requires_code() {
        let config = GateConfig::default();
        assert_eq!(config.mode, AuthMode::Required);
        assert_eq!(config.code_env, DEFAULT_CODE_ENV);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: GateConfig = toml::from_str("mode = \"disabled\"").unwrap();
        assert_eq!(config, GateConfig::disabled());
    }

    #[test]
    fn custom_env_var() {
        let config: GateConfig = toml::from_str("code_env = \"BOARD_CODE\"").unwrap();
        assert_eq!(config.mode, AuthMode::Required);
        assert_eq!(config.code_env, "BOARD_CODE");
    }
}
