use serde::{Deserialize, Serialize};

use scoreboard_types::sanitize_total;

/// One row of the backing table.
///
/// Rows are the store's view of a record: the name is kept as raw text and
/// only validated when the ledger turns rows into records. Cells from columns
/// the scoreboard does not use are carried in `extra`, in header order, so a
/// write puts them back where they came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub name: String,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl Row {
    /// Build a row, coercing the total into the non-negative domain.
    pub fn new(name: impl Into<String>, total: f64) -> Self {
        Self {
            name: name.into(),
            total: sanitize_total(total),
            extra: Vec::new(),
        }
    }

    /// Attach the cells of the table's other columns.
    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }
}

/// A whole stored table.
///
/// `header` is the header row exactly as stored. An empty header means the
/// default `Name,<total column>` layout; any other header is written back
/// unchanged, with the total column appended if it was missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// A table in the default layout.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            header: Vec::new(),
            rows,
        }
    }

    pub fn with_header(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` for a table without member rows, header or not.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
