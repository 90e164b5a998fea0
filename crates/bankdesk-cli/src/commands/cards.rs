use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bankdesk_core::cards::credit_cards::{self, CardBrowseQuery, CardFilter};
use bankdesk_core::config::{BankCatalog, CardTier};

use crate::input::{self, CliResult};

/// Arguments for browsing a bank's credit cards
#[derive(Args)]
pub struct CreditCardsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Bank ticker, e.g. AXISBANK.NS
    #[arg(long)]
    pub bank: Option<String>,

    /// Only show one tier: standard, premium, rewards, business
    #[arg(long)]
    pub tier: Option<CardTier>,

    /// Highest annual fee to show
    #[arg(long)]
    pub max_fee: Option<Decimal>,

    /// Expected yearly spend, used to apply fee waivers
    #[arg(long)]
    pub annual_spend: Option<Decimal>,
}

pub fn run_credit_cards(
    args: CreditCardsArgs,
    catalog: &BankCatalog,
) -> CliResult<Value> {
    let query: CardBrowseQuery = match input::file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => CardBrowseQuery {
            bank_id: args.bank.ok_or("--bank is required (or provide --input)")?,
            filter: CardFilter {
                tier: args.tier,
                max_annual_fee: args.max_fee,
                expected_annual_spend: args.annual_spend,
            },
        },
    };

    let output = credit_cards::browse_credit_cards_for_bank(catalog, &query)?;
    Ok(serde_json::to_value(output)?)
}
