use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use bankdesk_core::alerts::price_alert::{self, AlertDirection, PriceAlert};
use bankdesk_core::config::BankCatalog;
use bankdesk_core::market::data_source::StaticQuoteSource;

use crate::input::{self, CliResult};

/// Arguments for checking share-price alerts
#[derive(Args)]
pub struct PriceAlertArgs {
    /// Path to JSON file holding one alert or an array of alerts
    #[arg(long)]
    pub input: Option<String>,

    /// Bank ticker to watch
    #[arg(long)]
    pub bank: Option<String>,

    /// Address to notify
    #[arg(long)]
    pub email: Option<String>,

    /// Fire when the price goes above or below the target
    #[arg(long, value_parser = parse_direction)]
    pub direction: Option<AlertDirection>,

    /// Target share price
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Current price to test against (defaults to the catalog reference price)
    #[arg(long)]
    pub price: Option<Decimal>,
}

fn parse_direction(s: &str) -> Result<AlertDirection, String> {
    match s.trim().to_lowercase().as_str() {
        "above" | "up" => Ok(AlertDirection::Above),
        "below" | "down" => Ok(AlertDirection::Below),
        other => Err(format!("Unknown direction '{other}'. Use: above, below")),
    }
}

/// `--input` may hold a single alert or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum AlertBatch {
    Many(Vec<PriceAlert>),
    One(PriceAlert),
}

pub fn run_price_alert(
    args: PriceAlertArgs,
    catalog: &BankCatalog,
) -> CliResult<Value> {
    let alerts: Vec<PriceAlert> = match input::file_or_stdin(args.input.as_deref())? {
        Some(AlertBatch::Many(alerts)) => alerts,
        Some(AlertBatch::One(alert)) => vec![alert],
        None => vec![PriceAlert {
            bank_id: args.bank.clone().ok_or("--bank is required (or provide --input)")?,
            email: args.email.ok_or("--email is required (or provide --input)")?,
            direction: args
                .direction
                .ok_or("--direction is required (or provide --input)")?,
            target_price: args.target.ok_or("--target is required (or provide --input)")?,
        }],
    };

    let mut source = StaticQuoteSource::from_catalog(catalog);
    if let Some(price) = args.price {
        for alert in &alerts {
            source = source.with_price(&alert.bank_id, price);
        }
    }

    let output = price_alert::evaluate_with_source(&alerts, &source)?;
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_batch_accepts_one_or_many() {
        let one: AlertBatch = serde_json::from_str(
            r#"{"bank_id": "SBIN.NS", "email": "a@b.in", "direction": "above", "target_price": "900"}"#,
        )
        .unwrap();
        assert!(matches!(one, AlertBatch::One(ref a) if a.bank_id == "SBIN.NS"));

        let many: AlertBatch = serde_json::from_str(
            r#"[{"bank_id": "SBIN.NS", "email": "a@b.in", "direction": "above", "target_price": "900"},
                {"bank_id": "AXISBANK", "email": "c@d.in", "direction": "below", "target_price": "1000"}]"#,
        )
        .unwrap();
        match many {
            AlertBatch::Many(alerts) => assert_eq!(alerts.len(), 2),
            AlertBatch::One(_) => panic!("Expected an array of alerts"),
        }
    }

    #[test]
    fn test_parse_direction_synonyms() {
        assert_eq!(parse_direction("UP").unwrap(), AlertDirection::Above);
        assert_eq!(parse_direction(" below ").unwrap(), AlertDirection::Below);
        assert!(parse_direction("sideways").is_err());
    }
}
