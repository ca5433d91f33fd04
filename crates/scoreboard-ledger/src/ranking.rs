use serde::Serialize;

use scoreboard_types::{MemberName, Record};

/// One line of the ranking.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position.
    pub rank: usize,
    pub name: MemberName,
    pub total: f64,
    /// `total` relative to the top total, in `[0, 1]`.
    pub progress: f64,
}

/// Read-only projection of the ledger sorted by total, highest first.
///
/// Ties keep ledger order. Progress is measured against the highest total
/// when it is positive, otherwise against 1, so an all-zero board shows
/// empty bars and never divides by zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RankedView {
    pub entries: Vec<RankedEntry>,
    pub max_total: f64,
}

impl RankedView {
    pub fn from_records(records: &[Record]) -> Self {
        let max_total = records.iter().map(Record::total).fold(0.0, f64::max);
        let denominator = if max_total > 0.0 { max_total } else { 1.0 };

        let mut sorted: Vec<&Record> = records.iter().collect();
        // `sort_by` is stable, which keeps ties in ledger order.
        sorted.sort_by(|a, b| b.total().total_cmp(&a.total()));

        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(idx, record)| RankedEntry {
                rank: idx + 1,
                name: record.name().clone(),
                total: record.total(),
                progress: (record.total() / denominator).clamp(0.0, 1.0),
            })
            .collect();

        Self { entries, max_total }
    }

    /// The top entry, if it has a positive total.
    pub fn leader(&self) -> Option<&RankedEntry> {
        self.entries.first().filter(|entry| entry.total > 0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RankedView {
    type Item = &'a RankedEntry;
    type IntoIter = std::slice::Iter<'a, RankedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
