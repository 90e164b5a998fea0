use chrono::{NaiveDateTime, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use bankdesk_core::config::BankCatalog;
use bankdesk_core::market::indicators::{self, IndicatorInput};
use bankdesk_core::market::risk::{self, ParametricVarInput};
use bankdesk_core::market::sentiment::{self, SentimentInput};
use bankdesk_core::market::session;

use crate::input::{self, CliResult};

/// Arguments for sentiment analysis
#[derive(Args)]
pub struct SentimentArgs {
    /// Path to JSON input file with a "changes" array
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated daily changes in percent (e.g. "0.8,-0.2,1.1")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub changes: Option<Vec<Decimal>>,
}

/// Arguments for parametric Value at Risk
#[derive(Args)]
pub struct VarArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated periodic returns in percent
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub returns: Option<Vec<Decimal>>,

    /// Confidence level (e.g. 0.95 for 95%)
    #[arg(long, default_value = "0.95")]
    pub confidence: Decimal,

    /// Position value for monetary VaR
    #[arg(long)]
    pub position_value: Option<Decimal>,
}

/// Arguments for technical indicators
#[derive(Args)]
pub struct IndicatorsArgs {
    /// Path to JSON input file with a "closes" array
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated closing prices, oldest first
    #[arg(long, value_delimiter = ',')]
    pub closes: Option<Vec<Decimal>>,

    /// Moving average window
    #[arg(long, default_value = "20")]
    pub sma_window: usize,

    /// RSI look-back
    #[arg(long, default_value = "14")]
    pub rsi_period: usize,

    /// Drop the full series and print only the latest values
    #[arg(long)]
    pub latest: bool,
}

/// Arguments for exchange session status
#[derive(Args)]
pub struct MarketStatusArgs {
    /// Exchange local time as "YYYY-MM-DD HH:MM" (defaults to now)
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Deserialize)]
struct ReturnsFile {
    returns: Vec<Decimal>,
    #[serde(default)]
    confidence: Option<Decimal>,
    #[serde(default)]
    position_value: Option<Decimal>,
}

pub fn run_sentiment(args: SentimentArgs) -> CliResult<Value> {
    let changes: Vec<Decimal> = if let Some(ref path) = args.input {
        input::file::read_json::<SentimentInput>(path)?.changes
    } else if let Some(changes) = args.changes {
        changes
    } else if let Some(data) = input::stdin::read_stdin::<SentimentInput>()? {
        data.changes
    } else {
        return Err("Provide --changes or --input with a \"changes\" array".into());
    };

    let output = sentiment::analyze_sentiment(&changes)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_var(args: VarArgs) -> CliResult<Value> {
    let from_file: Option<ReturnsFile> = if let Some(ref path) = args.input {
        Some(input::file::read_json(path)?)
    } else if args.returns.is_none() {
        input::stdin::read_stdin()?
    } else {
        None
    };

    let var_input = match from_file {
        Some(file) => ParametricVarInput {
            returns: file.returns,
            confidence: file.confidence.unwrap_or(args.confidence),
            position_value: file.position_value.or(args.position_value),
        },
        None => ParametricVarInput {
            returns: args
                .returns
                .ok_or("Provide --returns or --input with a \"returns\" array")?,
            confidence: args.confidence,
            position_value: args.position_value,
        },
    };

    let output = risk::parametric_var(&var_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_indicators(args: IndicatorsArgs) -> CliResult<Value> {
    let indicator_input: IndicatorInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(closes) = args.closes {
        IndicatorInput {
            sma_window: args.sma_window,
            rsi_period: args.rsi_period,
            ..IndicatorInput::new(closes)
        }
    } else if let Some(parsed) = input::stdin::read_stdin()? {
        parsed
    } else {
        return Err("Provide --closes or --input with a \"closes\" array".into());
    };

    let output = indicators::compute_indicators(&indicator_input)?;
    let mut value = serde_json::to_value(&output)?;
    if args.latest {
        if let Some(latest) = value.get("result").and_then(|r| r.get("latest")).cloned() {
            value["result"] = latest;
        }
    }
    Ok(value)
}

pub fn run_market_status(
    args: MarketStatusArgs,
    catalog: &BankCatalog,
) -> CliResult<Value> {
    let report = match args.at {
        Some(ref at) => {
            let local = NaiveDateTime::parse_from_str(at.trim(), "%Y-%m-%d %H:%M")
                .map_err(|e| format!("Invalid --at '{}': {} (expected YYYY-MM-DD HH:MM)", at, e))?;
            session::session_report(local, &catalog.session, &catalog.holidays)?
        }
        None => session::session_report_utc(Utc::now(), &catalog.session, &catalog.holidays)?,
    };
    Ok(serde_json::to_value(report)?)
}
