//! Tabular backing stores for the scoreboard.
//!
//! The ledger persists its whole table on every mutation and reads it back on
//! load. A store only interprets the `Name` column and the total column,
//! coercing the latter to a number. Other columns ride along unchanged.
//!
//! # Storage Backends
//!
//! All backends implement the [`TableStore`] trait:
//!
//! - [`InMemoryTableStore`] -- per-session table, lost when the process exits
//! - [`CsvFileStore`] -- local flat file with at least `Name` and the total column
//!
//! # Design Rules
//!
//! 1. `read` returns `Ok(None)` when the resource does not exist yet.
//! 2. A missing total column reads as zero; non-numeric cells read as zero.
//! 3. `write` replaces the whole table. There is no partial update.
//!    Columns the scoreboard does not use keep their header position.
//! 4. No retries. Every call is a single attempt and errors are returned.

pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod row;
pub mod traits;

pub use codec::{coerce_total, parse_table, render_export, render_table, NAME_COLUMN};
pub use error::{StoreError, StoreResult};
pub use file::CsvFileStore;
pub use memory::InMemoryTableStore;
pub use row::{Row, Table};
pub use traits::TableStore;
