use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bankdesk_core::config::BankCatalog;
use bankdesk_core::deposits::fixed_deposit::{self, FixedDepositQuery};

use crate::input::{self, CliResult};

/// Arguments for a fixed-deposit maturity quote
#[derive(Args)]
pub struct FdQuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Bank ticker, e.g. SBIN.NS
    #[arg(long)]
    pub bank: Option<String>,

    /// Deposit amount in rupees
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Tenure in days
    #[arg(long)]
    pub days: Option<u32>,

    /// Apply the senior-citizen rate
    #[arg(long)]
    pub senior: bool,
}

pub fn run_fd_quote(
    args: FdQuoteArgs,
    catalog: &BankCatalog,
) -> CliResult<Value> {
    let query: FixedDepositQuery = match input::file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => FixedDepositQuery {
            bank_id: args.bank.ok_or("--bank is required (or provide --input)")?,
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            tenure_days: args.days.ok_or("--days is required (or provide --input)")?,
            senior_citizen: args.senior,
        },
    };

    let output = fixed_deposit::quote_fixed_deposit_for_bank(catalog, &query)?;
    Ok(serde_json::to_value(output)?)
}
