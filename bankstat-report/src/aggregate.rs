//! Pure reductions over classified transactions: summary totals, balance
//! series, time-bucket rollups, extremes, and counterparty aggregates.
//!
//! Determinism rules baked in here:
//! - rollup rows come out in bucket-key-ascending order;
//! - extremes ties resolve to the earliest bucket;
//! - payee ties preserve first-encounter order (stable sort).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use bankstat_core::bucket::{BucketKey, Granularity};
use bankstat_core::config::TransferPolicy;
use bankstat_core::transaction::{ClassifiedTransaction, Transaction};

/// Which signed slice of the transactions a rollup measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricFamily {
    /// Absolute values of negative amounts.
    Expenditure,
    /// Positive amounts as-is.
    Income,
    /// Every row, signed.
    Net,
}

impl MetricFamily {
    /// The value this family contributes for a transaction, or `None`
    /// when the row is outside the family.
    fn value(self, txn: &Transaction) -> Option<f64> {
        match self {
            MetricFamily::Expenditure => txn.is_expense().then(|| txn.abs_amount()),
            MetricFamily::Income => txn.is_income().then_some(txn.amount),
            MetricFamily::Net => Some(txn.amount),
        }
    }
}

/// One non-empty bucket of a rollup. `average` is always `total / count`
/// with `count > 0` by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub bucket: BucketKey,
    pub total: f64,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Highest/lowest rows of a rollup plus the mean of bucket averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupExtremes {
    pub highest: AggregateRow,
    pub lowest: AggregateRow,
    pub average_of_averages: f64,
}

/// A complete rollup. `extremes` is `None` only when `rows` is empty —
/// a valid empty result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    pub rows: Vec<AggregateRow>,
    pub extremes: Option<RollupExtremes>,
}

/// The four headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub transaction_count: usize,
    pub total_income: f64,
    /// Sum of absolute expense amounts; always non-negative.
    pub total_expenses: f64,
    /// Derived as `total_income - total_expenses`, never the raw sum,
    /// so transfer filtering cannot desynchronize the three.
    pub net_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date: chrono::NaiveDate,
    pub balance: f64,
}

/// Per-bucket income vs. expenses, outer-joined: a bucket with only one
/// side still appears with the other at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub bucket: BucketKey,
    pub income: f64,
    pub expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayeeAggregate {
    pub payee: String,
    /// Sum of absolute expense amounts; always non-negative.
    pub total_paid: f64,
    pub count: usize,
}

/// Apply the configured transfer policy once, ahead of every reduction.
/// Under `RemoveExcluded`, flagged rows disappear from every downstream
/// aggregate; under `IncludeAll` the flags are informational only.
pub fn apply_policy(
    txns: Vec<ClassifiedTransaction>,
    policy: TransferPolicy,
) -> Vec<ClassifiedTransaction> {
    match policy {
        TransferPolicy::IncludeAll => txns,
        TransferPolicy::RemoveExcluded => {
            txns.into_iter().filter(|c| !c.is_excluded_transfer).collect()
        }
    }
}

pub fn summary(txns: &[ClassifiedTransaction]) -> Summary {
    let total_income: f64 = txns
        .iter()
        .filter(|c| c.txn.is_income())
        .map(|c| c.txn.amount)
        .sum();
    let total_expenses: f64 = txns
        .iter()
        .filter(|c| c.txn.is_expense())
        .map(|c| c.txn.abs_amount())
        .sum();
    Summary {
        transaction_count: txns.len(),
        total_income,
        total_expenses,
        net_flow: total_income - total_expenses,
    }
}

/// Balance trajectory in date-ascending order.
///
/// Uses the statement's own balances verbatim when every row carries
/// one; otherwise synthesizes a cumulative sum of amounts seeded at 0.
pub fn balance_series(txns: &[ClassifiedTransaction]) -> Vec<BalancePoint> {
    let mut ordered: Vec<&Transaction> = txns.iter().map(|c| &c.txn).collect();
    // Stable sort: same-date rows keep statement order.
    ordered.sort_by_key(|t| t.date);

    let verbatim: Option<Vec<BalancePoint>> = ordered
        .iter()
        .map(|t| {
            t.balance.map(|balance| BalancePoint {
                date: t.date,
                balance,
            })
        })
        .collect();

    verbatim.unwrap_or_else(|| {
        let mut running = 0.0;
        ordered
            .iter()
            .map(|t| {
                running += t.amount;
                BalancePoint {
                    date: t.date,
                    balance: running,
                }
            })
            .collect()
    })
}

/// Group one metric family into time buckets.
///
/// Emits only non-empty buckets, in key-ascending order.
pub fn rollup(
    txns: &[ClassifiedTransaction],
    granularity: Granularity,
    family: MetricFamily,
) -> Rollup {
    let mut buckets: BTreeMap<BucketKey, Vec<f64>> = BTreeMap::new();
    for c in txns {
        if let Some(value) = family.value(&c.txn) {
            buckets
                .entry(BucketKey::of(c.txn.date, granularity))
                .or_default()
                .push(value);
        }
    }

    let rows: Vec<AggregateRow> = buckets
        .into_iter()
        .map(|(bucket, values)| {
            let total: f64 = values.iter().sum();
            let count = values.len();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            AggregateRow {
                bucket,
                total,
                count,
                min,
                max,
                average: total / count as f64,
            }
        })
        .collect();

    let extremes = extremes(&rows);
    Rollup { rows, extremes }
}

/// Highest/lowest rows by total. Rows arrive key-ascending, and only a
/// strictly better total displaces the incumbent, so ties resolve to
/// the earliest bucket.
fn extremes(rows: &[AggregateRow]) -> Option<RollupExtremes> {
    let first = rows.first()?;
    let mut highest = first;
    let mut lowest = first;
    for row in &rows[1..] {
        if row.total > highest.total {
            highest = row;
        }
        if row.total < lowest.total {
            lowest = row;
        }
    }
    let average_of_averages =
        rows.iter().map(|r| r.average).sum::<f64>() / rows.len() as f64;
    Some(RollupExtremes {
        highest: highest.clone(),
        lowest: lowest.clone(),
        average_of_averages,
    })
}

/// Outer join of the income and expenditure rollups per bucket.
pub fn income_vs_expense(
    txns: &[ClassifiedTransaction],
    granularity: Granularity,
) -> Vec<ComparisonRow> {
    let mut buckets: BTreeMap<BucketKey, (f64, f64)> = BTreeMap::new();
    for c in txns {
        let txn = &c.txn;
        if txn.amount == 0.0 {
            continue;
        }
        let entry = buckets
            .entry(BucketKey::of(txn.date, granularity))
            .or_insert((0.0, 0.0));
        if txn.is_income() {
            entry.0 += txn.amount;
        } else {
            entry.1 += txn.abs_amount();
        }
    }
    buckets
        .into_iter()
        .map(|(bucket, (income, expenses))| ComparisonRow {
            bucket,
            income,
            expenses,
        })
        .collect()
}

/// N largest counterparties by total spend.
///
/// Groups expense rows by payee label in first-encounter order, then
/// stable-sorts descending by total so equal totals keep that order.
pub fn top_payees(txns: &[ClassifiedTransaction], n: usize) -> Vec<PayeeAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut aggregates: Vec<PayeeAggregate> = Vec::new();

    for c in txns {
        if !c.txn.is_expense() {
            continue;
        }
        let Some(payee) = c.payee.as_deref() else {
            continue;
        };
        let slot = *index.entry(payee).or_insert_with(|| {
            aggregates.push(PayeeAggregate {
                payee: payee.to_string(),
                total_paid: 0.0,
                count: 0,
            });
            aggregates.len() - 1
        });
        aggregates[slot].total_paid += c.txn.abs_amount();
        aggregates[slot].count += 1;
    }

    aggregates.sort_by(|a, b| b.total_paid.total_cmp(&a.total_paid));
    aggregates.truncate(n);
    aggregates
}

/// Latest-first transaction listing, capped at `limit`.
pub fn recent(txns: &[ClassifiedTransaction], limit: usize) -> Vec<Transaction> {
    let mut ordered: Vec<&Transaction> = txns.iter().map(|c| &c.txn).collect();
    ordered.sort_by_key(|t| std::cmp::Reverse(t.date));
    ordered.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankstat_core::Classifier;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn classified(rows: &[(NaiveDate, &str, f64)]) -> Vec<ClassifiedTransaction> {
        let classifier = Classifier::new(&[]);
        rows.iter()
            .map(|&(date, description, amount)| {
                classifier.classify(Transaction {
                    date,
                    description: description.to_string(),
                    amount,
                    balance: None,
                })
            })
            .collect()
    }

    #[test]
    fn test_summary_totals_and_net() {
        let txns = classified(&[
            (date(2023, 1, 5), "salary", 1000.0),
            (date(2023, 1, 6), "rent", -400.0),
            (date(2023, 1, 7), "void", 0.0),
            (date(2023, 1, 8), "snacks", -100.0),
        ]);
        let s = summary(&txns);
        assert_eq!(s.transaction_count, 4);
        assert_eq!(s.total_income, 1000.0);
        assert_eq!(s.total_expenses, 500.0);
        assert_eq!(s.net_flow, 500.0);
        // Idempotent: same input, same answer.
        assert_eq!(summary(&txns), s);
    }

    #[test]
    fn test_balance_series_synthetic_cumulative() {
        let txns = classified(&[
            (date(2023, 1, 1), "a", 100.0),
            (date(2023, 1, 2), "b", -30.0),
            (date(2023, 1, 3), "c", 50.0),
        ]);
        let series = balance_series(&txns);
        let balances: Vec<f64> = series.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![100.0, 70.0, 120.0]);
    }

    #[test]
    fn test_balance_series_verbatim_when_all_present() {
        let classifier = Classifier::new(&[]);
        let txns: Vec<ClassifiedTransaction> = [
            (date(2023, 1, 2), -30.0, 970.0),
            (date(2023, 1, 1), 1000.0, 1000.0),
        ]
        .iter()
        .map(|&(date, amount, balance)| {
            classifier.classify(Transaction {
                date,
                description: "x".to_string(),
                amount,
                balance: Some(balance),
            })
        })
        .collect();

        let series = balance_series(&txns);
        // Sorted by date, bank balances used as-is.
        assert_eq!(series[0].date, date(2023, 1, 1));
        assert_eq!(series[0].balance, 1000.0);
        assert_eq!(series[1].balance, 970.0);
    }

    #[test]
    fn test_mixed_balance_column_falls_back_to_synthetic() {
        // One row without a bank balance poisons the whole column: the
        // series must be entirely cumulative, never a mix of scales.
        let classifier = Classifier::new(&[]);
        let txns: Vec<ClassifiedTransaction> = [
            (date(2023, 1, 1), 100.0, Some(100.0)),
            (date(2023, 1, 2), -30.0, None),
            (date(2023, 1, 3), 50.0, Some(120.0)),
        ]
        .iter()
        .map(|&(date, amount, balance)| {
            classifier.classify(Transaction {
                date,
                description: "x".to_string(),
                amount,
                balance,
            })
        })
        .collect();

        let series = balance_series(&txns);
        let balances: Vec<f64> = series.iter().map(|p| p.balance).collect();
        assert_eq!(balances, vec![100.0, 70.0, 120.0]);
    }

    #[test]
    fn test_rollup_partitions_expenses_exactly() {
        let txns = classified(&[
            (date(2023, 1, 5), "a", -100.0),
            (date(2023, 1, 20), "b", -50.0),
            (date(2023, 2, 1), "c", -200.0),
            (date(2023, 2, 2), "income", 999.0),
        ]);
        let r = rollup(&txns, Granularity::Month, MetricFamily::Expenditure);
        assert_eq!(r.rows.len(), 2);
        let rollup_total: f64 = r.rows.iter().map(|row| row.total).sum();
        assert_eq!(rollup_total, summary(&txns).total_expenses);
        // Buckets come out key-ascending.
        assert_eq!(r.rows[0].bucket, BucketKey::Month(2023, 1));
        assert_eq!(r.rows[0].total, 150.0);
        assert_eq!(r.rows[0].count, 2);
        assert_eq!(r.rows[0].min, 50.0);
        assert_eq!(r.rows[0].max, 100.0);
        assert_eq!(r.rows[0].average, 75.0);
    }

    #[test]
    fn test_rollup_emits_no_empty_buckets() {
        let txns = classified(&[(date(2023, 3, 1), "income only", 500.0)]);
        let r = rollup(&txns, Granularity::Month, MetricFamily::Expenditure);
        assert!(r.rows.is_empty());
        assert!(r.extremes.is_none());
    }

    #[test]
    fn test_net_rollup_counts_every_row() {
        let txns = classified(&[
            (date(2023, 1, 5), "in", 1000.0),
            (date(2023, 1, 6), "out", -400.0),
            (date(2023, 1, 7), "void", 0.0),
        ]);
        let r = rollup(&txns, Granularity::Month, MetricFamily::Net);
        assert_eq!(r.rows[0].count, 3);
        assert_eq!(r.rows[0].total, 600.0);
    }

    #[test]
    fn test_extremes_tie_breaks_to_earliest_bucket() {
        let txns = classified(&[
            (date(2023, 1, 10), "jan", -500.0),
            (date(2023, 2, 10), "feb", -500.0),
        ]);
        let r = rollup(&txns, Granularity::Month, MetricFamily::Expenditure);
        let extremes = r.extremes.unwrap();
        assert_eq!(extremes.highest.bucket, BucketKey::Month(2023, 1));
        assert_eq!(extremes.lowest.bucket, BucketKey::Month(2023, 1));
        assert_eq!(extremes.average_of_averages, 500.0);
    }

    #[test]
    fn test_income_vs_expense_outer_join() {
        let txns = classified(&[
            (date(2023, 1, 5), "income only month", 800.0),
            (date(2023, 2, 5), "expense only month", -300.0),
        ]);
        let rows = income_vs_expense(&txns, Granularity::Month);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bucket, BucketKey::Month(2023, 1));
        assert_eq!(rows[0].income, 800.0);
        assert_eq!(rows[0].expenses, 0.0);
        assert_eq!(rows[1].income, 0.0);
        assert_eq!(rows[1].expenses, 300.0);
    }

    #[test]
    fn test_top_payees_stable_on_ties() {
        let txns = classified(&[
            (date(2023, 1, 1), "Paid to Alpha", -300.0),
            (date(2023, 1, 2), "Paid to Beta", -300.0),
            (date(2023, 1, 3), "Paid to Gamma", -100.0),
        ]);
        let payees = top_payees(&txns, 2);
        assert_eq!(payees.len(), 2);
        assert_eq!(payees[0].payee, "Alpha");
        assert_eq!(payees[1].payee, "Beta");
        assert_eq!(payees[0].total_paid, 300.0);
    }

    #[test]
    fn test_top_payees_groups_repeat_counterparties() {
        let txns = classified(&[
            (date(2023, 1, 1), "Paid to Foodpanda", -100.0),
            (date(2023, 1, 8), "Paid to Foodpanda", -150.0),
            (date(2023, 1, 9), "Paid to Careem", -50.0),
        ]);
        let payees = top_payees(&txns, 20);
        assert_eq!(payees[0].payee, "Foodpanda");
        assert_eq!(payees[0].total_paid, 250.0);
        assert_eq!(payees[0].count, 2);
    }

    #[test]
    fn test_apply_policy_remove_excluded_drops_rows_everywhere() {
        let classifier = Classifier::new(&["Daniyal".to_string()]);
        let txns: Vec<ClassifiedTransaction> = [
            (date(2023, 1, 1), "Salary", 1000.0),
            (date(2023, 1, 2), "Transfer to Daniyal - ref", -400.0),
            (date(2023, 1, 3), "Paid to Shop", -100.0),
        ]
        .iter()
        .map(|&(date, description, amount)| {
            classifier.classify(Transaction {
                date,
                description: description.to_string(),
                amount,
                balance: None,
            })
        })
        .collect();

        let kept = apply_policy(txns.clone(), TransferPolicy::IncludeAll);
        assert_eq!(summary(&kept).total_expenses, 500.0);
        assert_eq!(top_payees(&kept, 20).len(), 2);

        let filtered = apply_policy(txns, TransferPolicy::RemoveExcluded);
        assert_eq!(filtered.len(), 2);
        assert_eq!(summary(&filtered).total_expenses, 100.0);
        let payees = top_payees(&filtered, 20);
        assert_eq!(payees.len(), 1);
        assert_eq!(payees[0].payee, "Shop");
    }

    #[test]
    fn test_recent_is_latest_first_and_capped() {
        let txns = classified(&[
            (date(2023, 1, 1), "old", -10.0),
            (date(2023, 3, 1), "new", -30.0),
            (date(2023, 2, 1), "mid", -20.0),
        ]);
        let listing = recent(&txns, 2);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].description, "new");
        assert_eq!(listing[1].description, "mid");
    }
}
