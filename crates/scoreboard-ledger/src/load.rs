use std::fmt;

use tracing::{debug, warn};

use scoreboard_store::TableStore;
use scoreboard_types::MemberName;

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Where a loaded ledger came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// Rows were read from the store.
    Stored,
    /// The store holds no data yet; the ledger was seeded from the roster.
    Seeded,
    /// The store could not be read; the ledger was seeded from the roster.
    Fallback { reason: String },
}

impl LoadSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => f.write_str("stored"),
            Self::Seeded => f.write_str("seeded (no data yet)"),
            Self::Fallback { reason } => write!(f, "fallback (store unreadable: {reason})"),
        }
    }
}

/// A ledger together with where it came from.
#[derive(Clone, Debug)]
pub struct LoadOutcome {
    pub ledger: Ledger,
    pub source: LoadSource,
}

/// Read the ledger from `store`.
///
/// Returns `Ok(None)` when the store has no rows yet. Read and decode
/// failures are returned as errors.
pub fn try_load(store: &dyn TableStore) -> Result<Option<Ledger>, LedgerError> {
    match store.read()? {
        Some(table) if !table.is_empty() => Ok(Some(Ledger::from_table(&table))),
        _ => Ok(None),
    }
}

/// Read the ledger from `store`, falling back to a seeded ledger.
///
/// Never fails. The returned [`LoadSource`] tells "no data yet" apart from
/// "store unreachable".
pub fn load(store: &dyn TableStore, roster: &[MemberName]) -> LoadOutcome {
    match try_load(store) {
        Ok(Some(ledger)) => {
            debug!(store = %store.describe(), members = ledger.len(), "ledger loaded");
            LoadOutcome {
                ledger,
                source: LoadSource::Stored,
            }
        }
        Ok(None) => {
            debug!(store = %store.describe(), members = roster.len(), "store empty; seeding roster");
            LoadOutcome {
                ledger: Ledger::seeded(roster),
                source: LoadSource::Seeded,
            }
        }
        Err(e) => {
            warn!(store = %store.describe(), error = %e, "store unreadable; seeding roster");
            LoadOutcome {
                ledger: Ledger::seeded(roster),
                source: LoadSource::Fallback {
                    reason: e.to_string(),
                },
            }
        }
    }
}
