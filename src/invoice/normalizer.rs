//! Turns the model's extraction reply into a validated item table.
//!
//! The reply is untrusted free text. Anything that does not parse cleanly
//! becomes [`ExtractionResult::Failed`]; rows are never returned partially.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::table::{parse_amount, ItemTable, LineRecord, TOTAL_MARKER};
use crate::ai::prompts::{SENTINEL_NO_ITEMS, SENTINEL_UNREADABLE};

const FULL_COLUMNS: [&str; 5] = [
    "Item Number",
    "Item Name",
    "Item Price",
    "Total Tax amount",
    "Total Price",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The model could not be reached.
    Gateway,
    /// The model answered with text that is not a valid table.
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Empty,
    Unreadable,
    Rows(ItemTable),
    Failed(FailureReason),
}

impl ExtractionResult {
    pub fn table(&self) -> Option<&ItemTable> {
        match self {
            ExtractionResult::Rows(table) => Some(table),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no tabular text")]
    EmptyText,
    #[error("unrecognized header: {0}")]
    UnknownHeader(String),
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {column} is not a decimal number: {value:?}")]
    NotDecimal {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: missing item number")]
    MissingItemNumber { line: u64 },
    #[error("line {line}: rows after the total row")]
    RowAfterTotal { line: u64 },
    #[error("no total row")]
    MissingTotal,
    #[error("no line items")]
    NoLineItems,
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("re-serialized table does not match the parsed one")]
    RoundTrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schema {
    /// Item Number, Item Name, Item Price, Total Tax amount, Total Price.
    Full,
    /// Item Number, Item Name, Price. Older prompt; still accepted.
    Legacy,
}

impl Schema {
    fn width(self) -> usize {
        match self {
            Schema::Full => 5,
            Schema::Legacy => 3,
        }
    }

    fn detect(header: &csv::StringRecord) -> Result<Self, ParseError> {
        let cells: Vec<&str> = header.iter().collect();

        if cells.len() == 5
            && cells
                .iter()
                .zip(FULL_COLUMNS)
                .all(|(cell, expected)| cell.eq_ignore_ascii_case(expected))
        {
            return Ok(Schema::Full);
        }
        if cells.len() == 3
            && cells[0].eq_ignore_ascii_case("Item Number")
            && cells[1].eq_ignore_ascii_case("Item Name")
            && (cells[2].eq_ignore_ascii_case("Price") || cells[2].eq_ignore_ascii_case("Item Price"))
        {
            return Ok(Schema::Legacy);
        }
        Err(ParseError::UnknownHeader(cells.join(",")))
    }
}

/// Classify a raw extraction reply.
#[instrument(level = "debug", skip(raw), fields(len = raw.len()))]
pub fn normalize(raw: &str) -> ExtractionResult {
    let trimmed = raw.trim();
    if trimmed == SENTINEL_NO_ITEMS {
        debug!("model reported no items");
        return ExtractionResult::Empty;
    }
    if trimmed == SENTINEL_UNREADABLE {
        debug!("model reported unreadable image");
        return ExtractionResult::Unreadable;
    }

    match parse_table(trimmed).and_then(canonicalize) {
        Ok(table) => {
            match table.totals_consistent() {
                Some(false) => warn!(
                    reported = %table.aggregate().total,
                    "aggregate row disagrees with the sum of line items"
                ),
                None => debug!("aggregate row is not numeric; skipped cross-check"),
                Some(true) => {}
            }
            debug!(rows = table.row_count(), "extraction parsed");
            ExtractionResult::Rows(table)
        }
        Err(err) => {
            warn!(error = %err, "rejecting extraction output");
            ExtractionResult::Failed(FailureReason::Malformed)
        }
    }
}

/// Strict parse of the tabular reply. Also accepts the bytes produced by
/// [`ItemTable::to_csv`].
pub fn parse_table(raw: &str) -> Result<ItemTable, ParseError> {
    let text = raw.trim().trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Err(ParseError::EmptyText);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                if !is_blank(&record) {
                    break record;
                }
            }
            None => return Err(ParseError::EmptyText),
        }
    };
    let schema = Schema::detect(&header)?;

    let mut lines = Vec::new();
    let mut aggregate: Option<LineRecord> = None;

    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != schema.width() {
            return Err(ParseError::ColumnCount {
                line,
                expected: schema.width(),
                found: record.len(),
            });
        }
        if aggregate.is_some() {
            return Err(ParseError::RowAfterTotal { line });
        }

        let row = to_record(schema, &record);
        if row.number.is_empty() && row.name == TOTAL_MARKER {
            aggregate = Some(row);
            continue;
        }
        if row.number.is_empty() {
            return Err(ParseError::MissingItemNumber { line });
        }
        for (column, value) in [
            ("price", &row.price),
            ("tax", &row.tax),
            ("total", &row.total),
        ] {
            if !is_decimal(value) {
                return Err(ParseError::NotDecimal {
                    line,
                    column,
                    value: value.clone(),
                });
            }
        }
        lines.push(row);
    }

    let aggregate = aggregate.ok_or(ParseError::MissingTotal)?;
    if lines.is_empty() {
        return Err(ParseError::NoLineItems);
    }
    Ok(ItemTable::new(lines, aggregate))
}

/// Emit the canonical artifact and make sure it reads back identically.
fn canonicalize(table: ItemTable) -> Result<ItemTable, ParseError> {
    let bytes = table.to_csv()?;
    let text = String::from_utf8_lossy(&bytes);
    if parse_table(&text)? != table {
        return Err(ParseError::RoundTrip);
    }
    Ok(table)
}

fn to_record(schema: Schema, record: &csv::StringRecord) -> LineRecord {
    let field = |i: usize| record.get(i).unwrap_or_default().to_string();
    match schema {
        Schema::Full => {
            let tax = field(3);
            LineRecord::new(
                field(0),
                field(1),
                field(2),
                if tax.is_empty() { "0".to_string() } else { tax },
                field(4),
            )
        }
        Schema::Legacy => {
            let price = field(2);
            LineRecord::new(field(0), field(1), price.clone(), "0", price)
        }
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(str::is_empty) && record.len() <= 1
}

fn is_decimal(value: &str) -> bool {
    parse_amount(value).is_some()
}
