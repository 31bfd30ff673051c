//! Analysis configuration: every knob the aggregation pipeline honors.
//!
//! All of these used to be embedded literals in the original dashboard;
//! here they are explicit parameters with sane defaults.

use serde::{Deserialize, Serialize};

use crate::bucket::Granularity;
use crate::currency::{CurrencyConverter, DisplayCurrency};

/// How excluded-transfer rows participate in aggregation.
///
/// One policy, applied once, before any reduction runs. Either every
/// aggregate sees the flagged rows or none does — the scope never varies
/// by code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferPolicy {
    /// Flags are carried on the rows but nothing is filtered out.
    IncludeAll,
    /// Flagged rows are removed from every downstream aggregate.
    RemoveExcluded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Counterparty name fragments whose "to <name>" transfers are flagged.
    pub excluded_counterparties: Vec<String>,
    pub transfer_policy: TransferPolicy,
    pub display_currency: DisplayCurrency,
    /// Base units per one secondary unit.
    pub exchange_rate: f64,
    /// Size of the top-payees table.
    pub top_payees: usize,
    /// Bucket size for the income-vs-expense comparison table.
    pub comparison_granularity: Granularity,
    /// Cap on the latest-first transaction listing.
    pub recent_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            excluded_counterparties: Vec::new(),
            transfer_policy: TransferPolicy::IncludeAll,
            display_currency: DisplayCurrency::Base,
            exchange_rate: 280.0,
            top_payees: 20,
            comparison_granularity: Granularity::Month,
            recent_limit: 100,
        }
    }
}

impl AnalysisConfig {
    pub fn converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(self.display_currency, self.exchange_rate)
    }
}
