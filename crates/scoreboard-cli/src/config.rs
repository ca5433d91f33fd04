use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use scoreboard_gate::GateConfig;
use scoreboard_ledger::{SessionConfig, WriteFailurePolicy};
use scoreboard_store::{CsvFileStore, InMemoryTableStore, TableStore};
use scoreboard_types::{MemberName, Unit};

/// Where the table lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    Csv { path: PathBuf },
    /// Session memory; nothing survives the process.
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Csv {
            path: PathBuf::from("scoreboard.csv"),
        }
    }
}

/// Contents of `scoreboard.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardConfig {
    pub unit: Unit,
    pub roster: Vec<MemberName>,
    pub on_write_failure: WriteFailurePolicy,
    pub store: StoreConfig,
    pub auth: GateConfig,
}

impl ScoreboardConfig {
    /// Read the config file, or fall back to defaults when it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self).context("serializing config")?;
        fs::write(path, text).with_context(|| format!("writing config {}", path.display()))
    }

    /// Build the configured store. Relative CSV paths resolve against
    /// `base`, normally the directory holding the config file.
    pub fn open_store(&self, base: &Path) -> Arc<dyn TableStore> {
        match &self.store {
            StoreConfig::Csv { path } => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    base.join(path)
                };
                Arc::new(CsvFileStore::new(path, self.unit.column_name()))
            }
            StoreConfig::Memory => Arc::new(InMemoryTableStore::new()),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            roster: self.roster.clone(),
            on_write_failure: self.on_write_failure,
        }
    }
}

/// Directory that relative paths in the config file are resolved against.
pub fn config_base(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
