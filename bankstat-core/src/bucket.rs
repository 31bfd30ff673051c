//! Time buckets: the grouping keys for rollup aggregation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rollup granularity selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

/// A time-grouping key. `Ord` follows chronology within a granularity,
/// which is what "earliest bucket" tie-breaking relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    Year(i32),
    Month(i32, u32),
    Day(NaiveDate),
}

impl BucketKey {
    /// Bucket a date at the given granularity. Pure function of the date.
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Year => BucketKey::Year(date.year()),
            Granularity::Month => BucketKey::Month(date.year(), date.month()),
            Granularity::Day => BucketKey::Day(date),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Year(y) => write!(f, "{y}"),
            BucketKey::Month(y, m) => write!(f, "{y}-{m:02}"),
            BucketKey::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
