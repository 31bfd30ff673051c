//! Report assembly: the seam between the aggregation core and whatever
//! renders it.
//!
//! `assemble` runs classify → policy filter → reduce → package, then
//! applies currency conversion exactly once over the finished report.
//! No other code divides by the exchange rate.

use serde::{Deserialize, Serialize};
use tracing::info;

use bankstat_core::bucket::Granularity;
use bankstat_core::classify::Classifier;
use bankstat_core::config::AnalysisConfig;
use bankstat_core::currency::{CurrencyConverter, DisplayCurrency};
use bankstat_core::transaction::Transaction;

use crate::aggregate::{
    self, BalancePoint, ComparisonRow, MetricFamily, PayeeAggregate, Rollup, Summary,
};

/// Everything the presentation layer reads, in the display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub currency: DisplayCurrency,
    pub summary: Summary,
    pub balance_series: Vec<BalancePoint>,
    /// Balance at the latest date, absent for empty statements.
    pub current_balance: Option<f64>,
    pub daily: Rollup,
    pub monthly: Rollup,
    pub yearly: Rollup,
    /// Net amount and transaction count per month.
    pub monthly_summary: Rollup,
    pub income_vs_expense: Vec<ComparisonRow>,
    pub top_payees: Vec<PayeeAggregate>,
    /// Latest-first transaction listing.
    pub recent: Vec<Transaction>,
}

/// Build the full report for one parsed statement.
pub fn assemble(transactions: Vec<Transaction>, config: &AnalysisConfig) -> Report {
    let classifier = Classifier::new(&config.excluded_counterparties);
    let classified: Vec<_> = transactions
        .into_iter()
        .map(|t| classifier.classify(t))
        .collect();
    let total = classified.len();

    let txns = aggregate::apply_policy(classified, config.transfer_policy);
    info!(
        transactions = total,
        after_policy = txns.len(),
        "assembling report"
    );

    let balance_series = aggregate::balance_series(&txns);
    let current_balance = balance_series.last().map(|p| p.balance);

    let report = Report {
        currency: config.display_currency,
        summary: aggregate::summary(&txns),
        balance_series,
        current_balance,
        daily: aggregate::rollup(&txns, Granularity::Day, MetricFamily::Expenditure),
        monthly: aggregate::rollup(&txns, Granularity::Month, MetricFamily::Expenditure),
        yearly: aggregate::rollup(&txns, Granularity::Year, MetricFamily::Expenditure),
        monthly_summary: aggregate::rollup(&txns, Granularity::Month, MetricFamily::Net),
        income_vs_expense: aggregate::income_vs_expense(&txns, config.comparison_granularity),
        top_payees: aggregate::top_payees(&txns, config.top_payees),
        recent: aggregate::recent(&txns, config.recent_limit),
    };

    convert_report(report, &config.converter())
}

/// The single currency choke point: every monetary figure in the report
/// passes through the converter here and nowhere else.
fn convert_report(mut report: Report, converter: &CurrencyConverter) -> Report {
    if converter.display == DisplayCurrency::Base {
        return report;
    }

    let conv = |v: f64| converter.convert(v);

    report.summary.total_income = conv(report.summary.total_income);
    report.summary.total_expenses = conv(report.summary.total_expenses);
    report.summary.net_flow = conv(report.summary.net_flow);

    for point in &mut report.balance_series {
        point.balance = conv(point.balance);
    }
    report.current_balance = report.current_balance.map(conv);

    for rollup in [
        &mut report.daily,
        &mut report.monthly,
        &mut report.yearly,
        &mut report.monthly_summary,
    ] {
        convert_rollup(rollup, converter);
    }

    for row in &mut report.income_vs_expense {
        row.income = conv(row.income);
        row.expenses = conv(row.expenses);
    }
    for payee in &mut report.top_payees {
        payee.total_paid = conv(payee.total_paid);
    }
    for txn in &mut report.recent {
        txn.amount = conv(txn.amount);
        txn.balance = txn.balance.map(conv);
    }

    report
}

fn convert_rollup(rollup: &mut Rollup, converter: &CurrencyConverter) {
    let convert_row = |row: &mut crate::aggregate::AggregateRow| {
        row.total = converter.convert(row.total);
        row.min = converter.convert(row.min);
        row.max = converter.convert(row.max);
        row.average = converter.convert(row.average);
    };
    for row in &mut rollup.rows {
        convert_row(row);
    }
    if let Some(extremes) = &mut rollup.extremes {
        convert_row(&mut extremes.highest);
        convert_row(&mut extremes.lowest);
        extremes.average_of_averages = converter.convert(extremes.average_of_averages);
    }
}
