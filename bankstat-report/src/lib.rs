//! bankstat-report: aggregation reductions and report assembly.
//!
//! Everything in here is a pure function over classified transactions;
//! the same input always produces the same report.

pub mod aggregate;
pub mod assemble;

pub use aggregate::{
    AggregateRow, BalancePoint, ComparisonRow, MetricFamily, PayeeAggregate, Rollup,
    RollupExtremes, Summary,
};
pub use assemble::{Report, assemble};
