//! Parse failures are fatal to the whole load: callers get either a full
//! transaction table or a `ParseError` naming the offending row and
//! column. There is no partial-result path and nothing to retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing required column `{column}`")]
    MissingColumn { column: &'static str },

    /// `row` counts data rows from 1, excluding the header.
    #[error("row {row}: unparseable `{column}` value \"{value}\"")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
