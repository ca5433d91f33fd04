//! CSV encoding of the backing table.
//!
//! The scoreboard reads two columns: `Name` and the total column. Any other
//! columns in the sheet are carried through untouched, in their original
//! positions. Quoting follows RFC 4180: fields containing a comma, a quote,
//! or a line break are wrapped in quotes and embedded quotes are doubled.

use tracing::warn;

use scoreboard_types::sanitize_total;

use crate::error::{StoreError, StoreResult};
use crate::row::{Row, Table};

/// Header of the name column.
pub const NAME_COLUMN: &str = "Name";

/// Parse a numeric cell. Anything that is not a finite, non-negative number
/// reads as zero.
pub fn coerce_total(cell: &str) -> f64 {
    cell.trim().parse::<f64>().map(sanitize_total).unwrap_or(0.0)
}

/// What a header position holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Column {
    Name,
    Total,
    /// Index into [`Row::extra`].
    Extra(usize),
}

fn header_matches(cell: &str, wanted: &str) -> bool {
    cell.trim().eq_ignore_ascii_case(wanted)
}

/// Classify each header cell. The first `Name` match and the first total
/// match win; everything else is an extra column.
fn classify(header: &[String], total_column: &str) -> Vec<Column> {
    let mut columns = Vec::with_capacity(header.len());
    let (mut name, mut total, mut extra) = (false, false, 0);
    for cell in header {
        let column = if !name && header_matches(cell, NAME_COLUMN) {
            name = true;
            Column::Name
        } else if !total && header_matches(cell, total_column) {
            total = true;
            Column::Total
        } else {
            extra += 1;
            Column::Extra(extra - 1)
        };
        columns.push(column);
    }
    columns
}

/// The header to write and the meaning of each of its positions.
fn layout(table: &Table, total_column: &str) -> (Vec<String>, Vec<Column>) {
    if table.header.is_empty() {
        return (
            vec![NAME_COLUMN.to_string(), total_column.to_string()],
            vec![Column::Name, Column::Total],
        );
    }
    let mut header = table.header.clone();
    let mut columns = classify(&header, total_column);
    if !columns.contains(&Column::Name) {
        header.insert(0, NAME_COLUMN.to_string());
        columns.insert(0, Column::Name);
    }
    if !columns.contains(&Column::Total) {
        header.push(total_column.to_string());
        columns.push(Column::Total);
    }
    (header, columns)
}

/// Decode a table from CSV text.
///
/// Header lookup is case-insensitive and ignores surrounding whitespace. A
/// table without a `Name` column is malformed; a table without the total
/// column reads every total as zero. Rows with an empty name are skipped.
/// The header and the cells of other columns are kept as stored.
pub fn parse_table(text: &str, total_column: &str) -> StoreResult<Table> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = parse_records(text)?.into_iter();

    let Some(header) = records.next() else {
        return Ok(Table::default());
    };

    let columns = classify(&header, total_column);
    let name_idx = columns
        .iter()
        .position(|c| *c == Column::Name)
        .ok_or_else(|| StoreError::Malformed {
            line: 1,
            reason: format!("missing `{NAME_COLUMN}` column"),
        })?;
    let total_idx = columns.iter().position(|c| *c == Column::Total);
    if total_idx.is_none() {
        warn!(column = total_column, "total column missing; totals default to zero");
    }

    let rows = records
        .filter_map(|record| {
            let name = record.get(name_idx)?.trim();
            if name.is_empty() {
                return None;
            }
            let total = total_idx
                .and_then(|idx| record.get(idx))
                .map(|cell| coerce_total(cell))
                .unwrap_or(0.0);
            let extra = columns
                .iter()
                .enumerate()
                .filter(|(_, c)| matches!(c, Column::Extra(_)))
                .map(|(idx, _)| record.get(idx).cloned().unwrap_or_default())
                .collect();
            Some(Row::new(name, total).with_extra(extra))
        })
        .collect();

    Ok(Table::with_header(header, rows))
}

/// Encode a table as CSV for the backing store.
///
/// The output is canonical: parsing it and rendering again yields the same
/// text.
pub fn render_table(table: &Table, total_column: &str) -> String {
    render(table, total_column, escape)
}

/// Encode a table as CSV for a manual download.
///
/// Same layout as [`render_table`], but text cells that a spreadsheet would
/// evaluate as a formula are prefixed with `'`.
pub fn render_export(table: &Table, total_column: &str) -> String {
    render(table, total_column, |cell| escape(&neutralize_formula(cell)))
}

fn render(table: &Table, total_column: &str, text_cell: impl Fn(&str) -> String) -> String {
    let (header, columns) = layout(table, total_column);
    let mut out = String::new();
    push_record(&mut out, header.iter().map(|cell| escape(cell)));
    for row in &table.rows {
        push_record(
            &mut out,
            columns.iter().map(|column| match column {
                Column::Name => text_cell(&row.name),
                Column::Total => row.total.to_string(),
                Column::Extra(i) => text_cell(row.extra.get(*i).map_or("", String::as_str)),
            }),
        );
    }
    out
}

fn push_record(out: &mut String, cells: impl Iterator<Item = String>) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&cell);
    }
    out.push('\n');
}

fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn neutralize_formula(value: &str) -> String {
    let trimmed = value.trim_start();
    match trimmed.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}

fn parse_records(text: &str) -> StoreResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                line += 1;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(StoreError::Malformed {
            line: quote_line,
            reason: "unterminated quoted field".into(),
        });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records.retain(|r| !(r.len() == 1 && r[0].trim().is_empty()));
    Ok(records)
}
