use tracing::{debug, warn};

use crate::config::{AuthMode, GateConfig};
use crate::error::GateError;
use crate::secret::SharedSecret;

// ---------------------------------------------------------------------------
// AccessPolicy
// ---------------------------------------------------------------------------

/// How the gate decides whether a mutation may proceed.
#[derive(Clone, Debug)]
pub enum AccessPolicy {
    /// The caller must present this code.
    SharedCode(SharedSecret),
    /// No check; every mutation is allowed.
    Disabled,
}

impl AccessPolicy {
    /// Short name of the active mode, for status output and logs.
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::SharedCode(_) => AuthMode::Required,
            Self::Disabled => AuthMode::Disabled,
        }
    }
}

/// How a permitted mutation got through the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// The presented code matched.
    CodeVerified,
    /// The gate is disabled.
    Unrestricted,
}

// ---------------------------------------------------------------------------
// AccessGate
// ---------------------------------------------------------------------------

/// The single checkpoint in front of every ledger mutation.
#[derive(Clone, Debug)]
pub struct AccessGate {
    policy: AccessPolicy,
}

impl AccessGate {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    /// A gate that requires `code`.
    ///
    /// Returns [`GateError::MissingSecret`] for an empty code.
    pub fn shared_code(code: impl Into<String>) -> Result<Self, GateError> {
        let secret = SharedSecret::new(code).ok_or_else(|| GateError::MissingSecret {
            var: "<inline>".into(),
        })?;
        Ok(Self::new(AccessPolicy::SharedCode(secret)))
    }

    /// A gate that lets everything through.
    pub fn open() -> Self {
        Self::new(AccessPolicy::Disabled)
    }

    /// Build the gate from configuration, reading the code from the process
    /// environment.
    pub fn from_env(config: &GateConfig) -> Result<Self, GateError> {
        Self::from_config(config, |var| std::env::var(var).ok())
    }

    /// Build the gate from configuration with an explicit variable lookup.
    ///
    /// A required code that is unset or empty is an error: the gate never
    /// silently falls back to open.
    pub fn from_config(
        config: &GateConfig,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Self, GateError> {
        match config.mode {
            AuthMode::Disabled => {
                debug!("access gate disabled");
                Ok(Self::open())
            }
            AuthMode::Required => {
                let secret = lookup(&config.code_env)
                    .and_then(SharedSecret::new)
                    .ok_or_else(|| GateError::MissingSecret {
                        var: config.code_env.clone(),
                    })?;
                debug!(var = %config.code_env, "access gate requires shared code");
                Ok(Self::new(AccessPolicy::SharedCode(secret)))
            }
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn mode(&self) -> AuthMode {
        self.policy.mode()
    }

    /// Check a caller-supplied code.
    ///
    /// With a shared-code policy, a missing code is treated like a wrong one.
    pub fn authorize(&self, provided: Option<&str>) -> Result<Access, GateError> {
        match &self.policy {
            AccessPolicy::Disabled => Ok(Access::Unrestricted),
            AccessPolicy::SharedCode(secret) => {
                if secret.matches(provided.unwrap_or_default()) {
                    Ok(Access::CodeVerified)
                } else {
                    warn!(code_present = provided.is_some(), "admin code rejected");
                    Err(GateError::Denied)
                }
            }
        }
    }
}
