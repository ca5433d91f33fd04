use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec::{parse_table, render_table};
use crate::error::StoreResult;
use crate::row::Table;
use crate::traits::TableStore;

/// CSV flat-file table store.
///
/// The file holds a header with at least `Name` and the total column, then
/// one row per member. Other columns are preserved across writes. A missing
/// file reads as "nothing written yet". Writes go to a
/// temporary file in the same directory which is then renamed over the
/// target, so readers never observe a half-written table.
#[derive(Clone, Debug)]
pub struct CsvFileStore {
    path: PathBuf,
    total_column: String,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>, total_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            total_column: total_column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn total_column(&self) -> &str {
        &self.total_column
    }
}

impl TableStore for CsvFileStore {
    fn read(&self) -> StoreResult<Option<Table>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "table file does not exist");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let table = parse_table(&text, &self.total_column)?;
        debug!(path = %self.path.display(), rows = table.len(), "table file read");
        Ok(Some(table))
    }

    fn write(&self, table: &Table) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(render_table(table, &self.total_column).as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), rows = table.len(), "table file written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }
}
