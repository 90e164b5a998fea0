mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};

use commands::alerts::PriceAlertArgs;
use commands::cards::CreditCardsArgs;
use commands::deposits::FdQuoteArgs;
use commands::lending::{AmortizationArgs, CompareLoansArgs, LoanQuoteArgs};
use commands::market::{IndicatorsArgs, MarketStatusArgs, SentimentArgs, VarArgs};

/// Loan, deposit and market calculations for Indian banks
#[derive(Parser)]
#[command(
    name = "bankdesk",
    version,
    about = "Loan, deposit and market calculations for Indian banks",
    long_about = "A CLI for retail banking calculations with decimal precision. \
                  Quotes EMIs and amortization schedules, compares lenders, prices \
                  fixed deposits, browses credit cards, checks price alerts and runs \
                  simple market heuristics on NSE-listed banks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Bank catalog file (JSON or YAML) replacing the built-in five banks
    #[arg(long, global = true)]
    catalog: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote an EMI loan at one bank
    LoanQuote(LoanQuoteArgs),
    /// Print a full amortization schedule
    Amortization(AmortizationArgs),
    /// Rank every bank's offer for the same loan
    CompareLoans(CompareLoansArgs),
    /// Quote a fixed deposit
    FdQuote(FdQuoteArgs),
    /// Browse a bank's credit cards
    CreditCards(CreditCardsArgs),
    /// Check share-price alerts
    PriceAlert(PriceAlertArgs),
    /// Classify market sentiment from daily changes
    Sentiment(SentimentArgs),
    /// Parametric Value at Risk
    Var(VarArgs),
    /// SMA, RSI, Bollinger Bands and MACD
    Indicators(IndicatorsArgs),
    /// Is the exchange open
    MarketStatus(MarketStatusArgs),
    /// List the banks in the catalog
    Banks,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let catalog = || commands::catalog::load_catalog(cli.catalog.as_deref());

    let result: input::CliResult<serde_json::Value> = match cli.command {
        Commands::LoanQuote(args) => {
            catalog().and_then(|c| commands::lending::run_loan_quote(args, &c))
        }
        Commands::Amortization(args) => commands::lending::run_amortization(args),
        Commands::CompareLoans(args) => {
            catalog().and_then(|c| commands::lending::run_compare_loans(args, &c))
        }
        Commands::FdQuote(args) => catalog().and_then(|c| commands::deposits::run_fd_quote(args, &c)),
        Commands::CreditCards(args) => {
            catalog().and_then(|c| commands::cards::run_credit_cards(args, &c))
        }
        Commands::PriceAlert(args) => {
            catalog().and_then(|c| commands::alerts::run_price_alert(args, &c))
        }
        Commands::Sentiment(args) => commands::market::run_sentiment(args),
        Commands::Var(args) => commands::market::run_var(args),
        Commands::Indicators(args) => commands::market::run_indicators(args),
        Commands::MarketStatus(args) => {
            catalog().and_then(|c| commands::market::run_market_status(args, &c))
        }
        Commands::Banks => catalog().and_then(|c| commands::catalog::run_banks(&c)),
        Commands::Version => Ok(serde_json::json!({
            "name": "bankdesk",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    };

    output::emit(&cli.output, result);
}
