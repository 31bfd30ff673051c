//! Core transaction types shared across the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single statement row, typed. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive = credit/income, negative = debit/expense, zero = neither.
    pub amount: f64,
    /// Running balance when the statement carries an `Available Balance` column.
    pub balance: Option<f64>,
}

impl Transaction {
    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }
}

/// A transaction plus derived classification. The source `Transaction`
/// is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    pub txn: Transaction,
    /// True when the description names a configured excluded counterparty.
    pub is_excluded_transfer: bool,
    /// Heuristic counterparty label, present for every expense row.
    pub payee: Option<String>,
}
