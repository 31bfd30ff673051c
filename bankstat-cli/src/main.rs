use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;

use bankstat_core::bucket::Granularity;
use bankstat_core::config::{AnalysisConfig, TransferPolicy};
use bankstat_core::currency::DisplayCurrency;
use bankstat_report::{Report, assemble};

#[derive(Parser, Debug)]
#[command(name = "bankstat", version, about = "Bank statement aggregation CLI")]
struct Cli {
    /// Statement CSV with Date, Description, Amount columns
    #[arg(value_name = "CSV")]
    path: PathBuf,

    /// Display currency for every monetary figure
    #[arg(long, value_enum, default_value_t = CurrencyArg::Base)]
    currency: CurrencyArg,

    /// Base units per one secondary unit
    #[arg(long, default_value_t = 280.0)]
    rate: f64,

    /// Counterparty name fragment to flag as an excluded transfer (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    excluded: Vec<String>,

    /// What happens to excluded-transfer rows
    #[arg(long, value_enum, default_value_t = PolicyArg::IncludeAll)]
    policy: PolicyArg,

    /// Size of the top-payees table
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Bucket size for the income-vs-expense comparison
    #[arg(long, value_enum, default_value_t = GranularityArg::Month)]
    granularity: GranularityArg,

    /// Cap on the latest-first transaction listing
    #[arg(long, value_name = "N", default_value_t = 100)]
    recent: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the headline metrics and extremes, human-readable
    Summary,

    /// Print the full structured report as JSON
    Report,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CurrencyArg {
    Base,
    Secondary,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    IncludeAll,
    RemoveExcluded,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GranularityArg {
    Day,
    Month,
    Year,
}

impl Cli {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            excluded_counterparties: self.excluded.clone(),
            transfer_policy: match self.policy {
                PolicyArg::IncludeAll => TransferPolicy::IncludeAll,
                PolicyArg::RemoveExcluded => TransferPolicy::RemoveExcluded,
            },
            display_currency: match self.currency {
                CurrencyArg::Base => DisplayCurrency::Base,
                CurrencyArg::Secondary => DisplayCurrency::Secondary,
            },
            exchange_rate: self.rate,
            top_payees: self.top,
            comparison_granularity: match self.granularity {
                GranularityArg::Day => Granularity::Day,
                GranularityArg::Month => Granularity::Month,
                GranularityArg::Year => Granularity::Year,
            },
            recent_limit: self.recent,
        }
    }
}

fn main() -> Result<()> {
    fn get_rust_log() -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(get_rust_log()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let txns = bankstat_ingest::parse_statement_path(&cli.path)?;
    info!(transactions = txns.len(), path = %cli.path.display(), "loaded statement");

    let report = assemble(txns, &cli.config());

    match cli.command {
        Command::Summary => print_summary(&report),
        Command::Report => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_summary(report: &Report) {
    let s = &report.summary;
    println!("Transactions:   {}", s.transaction_count);
    println!("Total income:   {:.2}", s.total_income);
    println!("Total expenses: {:.2}", s.total_expenses);
    println!("Net flow:       {:.2}", s.net_flow);

    match report.current_balance {
        Some(balance) => println!("Balance:        {balance:.2}"),
        None => println!("Balance:        (no transactions)"),
    }

    match &report.monthly.extremes {
        Some(extremes) => {
            println!(
                "Highest spend:  {} ({:.2})",
                extremes.highest.bucket, extremes.highest.total
            );
            println!(
                "Lowest spend:   {} ({:.2})",
                extremes.lowest.bucket, extremes.lowest.total
            );
        }
        None => println!("No expenses recorded."),
    }

    if report.top_payees.is_empty() {
        println!("No payees found.");
        return;
    }
    println!("\nTop payees:");
    for payee in &report.top_payees {
        println!(
            "  {:<30} {:>12.2}  ({} txns)",
            payee.payee, payee.total_paid, payee.count
        );
    }
}
