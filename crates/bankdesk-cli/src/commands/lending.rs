use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bankdesk_core::config::{BankCatalog, LoanCategory};
use bankdesk_core::lending::amortization::{self, AmortizationInput, AmortizationRow};
use bankdesk_core::lending::comparison::{self, LoanComparisonInput};
use bankdesk_core::lending::loan_quote::{self, BankLoanQuery, LoanRequest};
use bankdesk_core::time_value;
use bankdesk_core::types::{monthly_rate_from_annual_percent, MONTHS_PER_YEAR};

use crate::input::{self, CliResult};

/// Arguments for a single-lender loan quote
#[derive(Args)]
pub struct LoanQuoteArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Bank ticker, e.g. SBIN.NS or HDFCBANK
    #[arg(long)]
    pub bank: Option<String>,

    /// Loan amount in rupees
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Loan category: home, personal, business, education, car, gold
    #[arg(long)]
    pub category: Option<LoanCategory>,

    /// Annual rate in percent to use instead of the bank's base rate
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Number of schedule rows to show (0 for none)
    #[arg(long, default_value = "12")]
    pub rows: usize,
}

/// Arguments for a full amortization schedule
#[derive(Args)]
pub struct AmortizationArgs {
    /// Path to JSON input file with principal, monthly_rate, monthly_payment, periods
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount in rupees
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate in percent
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Roll rows up into loan years
    #[arg(long)]
    pub yearly: bool,
}

/// Arguments for comparing every lender in the catalog
#[derive(Args)]
pub struct CompareLoansArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Loan category: home, personal, business, education, car, gold
    #[arg(long)]
    pub category: Option<LoanCategory>,

    /// Loan amount in rupees
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub term_years: Option<u32>,
}

pub fn run_loan_quote(
    args: LoanQuoteArgs,
    catalog: &BankCatalog,
) -> CliResult<Value> {
    let query: BankLoanQuery = match input::file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => BankLoanQuery {
            bank_id: args.bank.ok_or("--bank is required (or provide --input)")?,
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            category: args
                .category
                .ok_or("--category is required (or provide --input)")?,
        },
    };

    let output = match args.rate {
        Some(rate) => {
            let bank = catalog.get(&query.bank_id)?;
            let request = LoanRequest {
                principal: query.principal,
                annual_rate_percent: rate,
                term_years: query.term_years,
                category: query.category,
            };
            loan_quote::compute_loan_quote(&request, &bank.loan, &catalog.policy)?
        }
        None => loan_quote::quote_for_bank(catalog, &query)?,
    };

    let preview: Vec<AmortizationRow> = output.result.schedule().iter().take(args.rows).collect();
    let mut value = serde_json::to_value(&output)?;
    if !preview.is_empty() {
        if let Some(Value::Object(result)) = value.get_mut("result") {
            result.insert("schedule_preview".into(), serde_json::to_value(preview)?);
        }
    }
    Ok(value)
}

pub fn run_amortization(args: AmortizationArgs) -> CliResult<Value> {
    let schedule_input: AmortizationInput = match input::file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let principal = args
                .principal
                .ok_or("--principal is required (or provide --input)")?;
            let annual_rate = args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?;
            let term_years = args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?;
            let monthly_rate = monthly_rate_from_annual_percent(annual_rate);
            let periods = term_years
                .checked_mul(MONTHS_PER_YEAR)
                .ok_or("--term-years is too large")?;
            AmortizationInput {
                principal,
                monthly_rate,
                monthly_payment: time_value::annuity_payment(principal, monthly_rate, periods)?,
                periods,
            }
        }
    };

    let schedule = amortization::build_schedule(&schedule_input)?;
    if args.yearly {
        Ok(serde_json::to_value(schedule.yearly_summary())?)
    } else {
        Ok(serde_json::to_value(schedule.rows())?)
    }
}

pub fn run_compare_loans(
    args: CompareLoansArgs,
    catalog: &BankCatalog,
) -> CliResult<Value> {
    let comparison_input: LoanComparisonInput = match input::file_or_stdin(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => LoanComparisonInput {
            category: args
                .category
                .ok_or("--category is required (or provide --input)")?,
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
        },
    };

    let output = comparison::compare_loan_offers(catalog, &comparison_input)?;
    Ok(serde_json::to_value(output)?)
}
