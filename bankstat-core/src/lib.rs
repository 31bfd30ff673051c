//! bankstat-core: transaction types, classification, and currency handling
//! for bank-statement analysis.

pub mod bucket;
pub mod classify;
pub mod config;
pub mod currency;
pub mod transaction;

pub use bucket::{BucketKey, Granularity};
pub use classify::{Classifier, extract_payee};
pub use config::{AnalysisConfig, TransferPolicy};
pub use currency::{CurrencyConverter, DisplayCurrency};
pub use transaction::{ClassifiedTransaction, Transaction};
