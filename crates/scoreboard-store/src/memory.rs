use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::row::{Row, Table};
use crate::traits::TableStore;

/// In-memory table store.
///
/// Holds the table for the lifetime of one session only. Nothing survives
/// the process; use a manual CSV export to keep the data.
pub struct InMemoryTableStore {
    table: RwLock<Option<Table>>,
}

impl InMemoryTableStore {
    /// Create a store that has never been written.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(None),
        }
    }

    /// Create a store pre-filled with `rows` in the default layout.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self::with_table(Table::new(rows))
    }

    pub fn with_table(table: Table) -> Self {
        Self {
            table: RwLock::new(Some(table)),
        }
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.table.read().map(|t| t.is_none()).unwrap_or(true)
    }

    /// Forget the stored table.
    pub fn clear(&self) {
        if let Ok(mut table) = self.table.write() {
            *table = None;
        }
    }
}

impl Default for InMemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStore for InMemoryTableStore {
    fn read(&self) -> StoreResult<Option<Table>> {
        let table = self
            .table
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(table.clone())
    }

    fn write(&self, table: &Table) -> StoreResult<()> {
        let mut stored = self
            .table
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        *stored = Some(table.clone());
        debug!(rows = table.len(), "in-memory table replaced");
        Ok(())
    }

    fn describe(&self) -> String {
        "session memory".into()
    }
}

impl std::fmt::Debug for InMemoryTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self
            .table
            .read()
            .ok()
            .and_then(|t| t.as_ref().map(Table::len));
        f.debug_struct("InMemoryTableStore")
            .field("rows", &rows)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_reads_none() {
        let store = InMemoryTableStore::new();
        assert!(store.is_empty());
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let store = InMemoryTableStore::new();
        let table = Table::new(vec![Row::new("Alice", 3.0), Row::new("Bob", 0.0)]);
        store.write(&table).unwrap();
        assert!(!store.is_empty());
        assert_eq!(store.read().unwrap(), Some(table));
    }

    #[test]
    fn write_replaces_whole_table() {
        let store = InMemoryTableStore::with_rows(vec![Row::new("Alice", 3.0)]);
        let replacement = Table::new(vec![Row::new("Bob", 1.0)]);
        store.write(&replacement).unwrap();
        assert_eq!(store.read().unwrap(), Some(replacement));
    }

    #[test]
    fn write_of_read_is_idempotent() {
        let store = InMemoryTableStore::with_table(Table::with_header(
            vec!["Name".into(), "Team".into(), "Total Points".into()],
            vec![Row::new("Alice", 3.5).with_extra(vec!["Red".into()])],
        ));
        let before = store.read().unwrap().unwrap();
        store.write(&before).unwrap();
        assert_eq!(store.read().unwrap(), Some(before));
    }

    #[test]
    fn clear_forgets_table() {
        let store = InMemoryTableStore::with_rows(vec![Row::new("Alice", 3.0)]);
        store.clear();
        assert_eq!(store.read().unwrap(), None);
    }
}
