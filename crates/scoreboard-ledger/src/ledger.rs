use std::collections::HashMap;

use tracing::warn;

use scoreboard_store::{render_export, Row, Table};
use scoreboard_types::{MemberName, Record, Unit};

use crate::error::LedgerError;
use crate::ranking::RankedView;
use crate::request::DeltaRequest;

/// The member table.
///
/// Records keep the order they were seeded or loaded in; that order breaks
/// ties in rankings. The set of names is fixed when the ledger is built and
/// every total stays non-negative. The stored header and each member's cells
/// in other columns are kept so writing the ledger back loses nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    records: Vec<Record>,
    index: HashMap<MemberName, usize>,
    header: Vec<String>,
    /// Parallel to `records`.
    extra: Vec<Vec<String>>,
}

impl Ledger {
    /// A ledger with every roster member at zero. Duplicate names keep their
    /// first position.
    pub fn seeded(roster: &[MemberName]) -> Self {
        let mut ledger = Self::default();
        for name in roster {
            ledger.insert(Record::zero(name.clone()), Vec::new());
        }
        ledger
    }

    /// Build a ledger from a stored table.
    ///
    /// Rows with an invalid name are skipped; for duplicate names the first
    /// row wins.
    pub fn from_table(table: &Table) -> Self {
        let mut ledger = Self {
            header: table.header.clone(),
            ..Self::default()
        };
        for row in &table.rows {
            let name = match MemberName::new(&row.name) {
                Ok(name) => name,
                Err(e) => {
                    warn!(row = ?row, error = %e, "skipping row with invalid name");
                    continue;
                }
            };
            if !ledger.insert(Record::new(name, row.total), row.extra.clone()) {
                warn!(name = %row.name, "skipping duplicate row");
            }
        }
        ledger
    }

    /// The table to persist, in ledger order.
    pub fn to_table(&self) -> Table {
        let rows = self
            .records
            .iter()
            .zip(&self.extra)
            .map(|(record, extra)| {
                Row::new(record.name().as_str(), record.total()).with_extra(extra.clone())
            })
            .collect();
        Table::with_header(self.header.clone(), rows)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn names(&self) -> impl Iterator<Item = &MemberName> {
        self.records.iter().map(Record::name)
    }

    pub fn get(&self, name: &MemberName) -> Option<&Record> {
        self.index.get(name).map(|&idx| &self.records[idx])
    }

    pub fn total(&self, name: &MemberName) -> Option<f64> {
        self.get(name).map(Record::total)
    }

    pub fn contains(&self, name: &MemberName) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sorted ranking for display.
    pub fn rank(&self) -> RankedView {
        RankedView::from_records(&self.records)
    }

    /// The table as CSV for a manual download, headed for `unit`.
    pub fn export_csv(&self, unit: Unit) -> String {
        render_export(&self.to_table(), unit.column_name())
    }

    /// Apply a request and return `(previous, current)` totals.
    pub(crate) fn apply(&mut self, request: &DeltaRequest) -> Result<(f64, f64), LedgerError> {
        let idx = *self
            .index
            .get(request.name())
            .ok_or_else(|| LedgerError::UnknownMember(request.name().to_string()))?;
        let record = &mut self.records[idx];
        let previous = record.total();
        record.set_total(request.direction().apply(previous, request.delta()));
        Ok((previous, record.total()))
    }

    /// Overwrite one member's total. Used to roll back a failed write.
    pub(crate) fn restore(&mut self, name: &MemberName, total: f64) {
        if let Some(&idx) = self.index.get(name) {
            self.records[idx].set_total(total);
        }
    }

    fn insert(&mut self, record: Record, extra: Vec<String>) -> bool {
        if self.index.contains_key(record.name()) {
            return false;
        }
        self.index.insert(record.name().clone(), self.records.len());
        self.records.push(record);
        self.extra.push(extra);
        true
    }
}
