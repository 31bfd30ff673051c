//! Parse bank statement CSV exports into typed transactions.
//!
//! Expected header: `Date`, `Description`, `Amount`, and optionally
//! `Available Balance`. Amounts are signed (positive = credit). Any
//! malformed row aborts the whole load — the caller renders either the
//! complete table or the error, never a partial one.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io;
use std::path::Path;
use tracing::debug;

use bankstat_core::Transaction;

use crate::error::ParseError;

const COL_DATE: &str = "Date";
const COL_DESCRIPTION: &str = "Description";
const COL_AMOUNT: &str = "Amount";
const COL_BALANCE: &str = "Available Balance";

/// Date layouts accepted by the permissive parser, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d-%b-%Y",
];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn parse_amount(s: &str) -> Option<f64> {
    s.trim().replace(',', "").parse().ok()
}

/// Header column positions, resolved once per load.
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    balance: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, ParseError> {
        let find = |name: &'static str| -> Result<usize, ParseError> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(ParseError::MissingColumn { column: name })
        };
        Ok(Self {
            date: find(COL_DATE)?,
            description: find(COL_DESCRIPTION)?,
            amount: find(COL_AMOUNT)?,
            balance: headers.iter().position(|h| h.trim() == COL_BALANCE),
        })
    }
}

/// Parse every record of a headered CSV reader, preserving row order.
pub fn parse_statement<R: io::Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<Vec<Transaction>, ParseError> {
    let columns = Columns::resolve(rdr.headers()?)?;

    let mut txns = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Data rows are numbered from 1 in errors.
        txns.push(parse_record(&record, &columns, i + 1)?);
    }

    debug!(transactions = txns.len(), "parsed statement");
    Ok(txns)
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &Columns,
    row: usize,
) -> Result<Transaction, ParseError> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let invalid = |column: &'static str, value: &str| ParseError::InvalidField {
        row,
        column,
        value: value.to_string(),
    };

    let date_str = field(columns.date);
    let date = parse_date(date_str).ok_or_else(|| invalid(COL_DATE, date_str))?;

    let amount_str = field(columns.amount);
    let amount = parse_amount(amount_str).ok_or_else(|| invalid(COL_AMOUNT, amount_str))?;

    // Optional column; an empty cell means "not reported", not an error.
    let balance = match columns.balance {
        Some(idx) if !field(idx).trim().is_empty() => {
            let s = field(idx);
            Some(parse_amount(s).ok_or_else(|| invalid(COL_BALANCE, s))?)
        }
        _ => None,
    };

    Ok(Transaction {
        date,
        description: field(columns.description).trim().to_string(),
        amount,
        balance,
    })
}

/// Parse an in-memory CSV export.
pub fn parse_statement_str(data: &str) -> Result<Vec<Transaction>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(data.as_bytes());
    parse_statement(&mut rdr)
}

/// Parse a CSV file on disk.
pub fn parse_statement_path(path: impl AsRef<Path>) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .from_path(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;
    parse_statement(&mut rdr).with_context(|| format!("parsing {}", path.as_ref().display()))
}
