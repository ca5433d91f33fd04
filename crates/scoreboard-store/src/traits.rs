use crate::error::StoreResult;
use crate::row::Table;

/// A whole-table backing store.
///
/// Implementations must satisfy these invariants:
/// - `read` returns `Ok(None)` if nothing has been written yet, and
///   `Ok(Some(table))` otherwise, rows in stored order.
/// - `write` overwrites the full table. A subsequent `read` returns rows
///   equal to those written, including cells of columns the scoreboard does
///   not interpret.
/// - `write(read())` leaves the store unchanged.
/// - Failures are returned, never silently ignored.
pub trait TableStore: Send + Sync {
    /// Read the whole table.
    fn read(&self) -> StoreResult<Option<Table>>;

    /// Replace the stored table with `table`.
    fn write(&self, table: &Table) -> StoreResult<()>;

    /// Short human-readable description of where the table lives.
    fn describe(&self) -> String;
}
