//! Market mood from a run of daily percentage price changes.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::BankDeskError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::BankDeskResult;

const STRONG_MOVE: Decimal = dec!(0.5);
const MILD_MOVE: Decimal = dec!(0.2);
const CALM_VOLATILITY: Decimal = dec!(1.0);
const HIGH_VOLATILITY: Decimal = dec!(1.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Bullish,
    SlightlyBullish,
    Neutral,
    SlightlyBearish,
    Bearish,
    Volatile,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::SlightlyBullish => "Slightly Bullish",
            Sentiment::Neutral => "Neutral",
            Sentiment::SlightlyBearish => "Slightly Bearish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Volatile => "Volatile",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentInput {
    /// Daily price changes in percent (1.2 means +1.2%).
    pub changes: Vec<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReading {
    pub sentiment: Sentiment,
    pub average_change: Percent,
    /// Population standard deviation of the changes.
    pub volatility: Percent,
    pub observations: usize,
}

/// Classify a series of daily changes.
pub fn analyze_sentiment(changes: &[Percent]) -> BankDeskResult<ComputationOutput<SentimentReading>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if changes.is_empty() {
        return Err(BankDeskError::InsufficientData(
            "At least one price change is required.".into(),
        ));
    }

    let n = Decimal::from(changes.len());
    let mean = changes.iter().copied().sum::<Decimal>() / n;
    let variance = changes
        .iter()
        .map(|c| (*c - mean) * (*c - mean))
        .sum::<Decimal>()
        / n;
    let volatility = variance.sqrt().unwrap_or(Decimal::ZERO);

    let sentiment = classify(mean, volatility);

    if changes.len() < 5 {
        warnings.push(format!(
            "Only {} observations; the reading is not meaningful.",
            changes.len()
        ));
    }

    log::debug!("sentiment: mean={mean} sigma={volatility} -> {sentiment}");

    let output = SentimentReading {
        sentiment,
        average_change: mean.round_dp(4),
        volatility: volatility.round_dp(4),
        observations: changes.len(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "strong_move_pct": STRONG_MOVE.to_string(),
        "mild_move_pct": MILD_MOVE.to_string(),
        "calm_volatility_pct": CALM_VOLATILITY.to_string(),
        "high_volatility_pct": HIGH_VOLATILITY.to_string(),
    });

    Ok(with_metadata(
        "Threshold sentiment on mean and dispersion of daily changes",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// First matching rule wins.
fn classify(mean: Decimal, volatility: Decimal) -> Sentiment {
    if mean > STRONG_MOVE && volatility < CALM_VOLATILITY {
        Sentiment::Bullish
    } else if mean > MILD_MOVE {
        Sentiment::SlightlyBullish
    } else if mean < -STRONG_MOVE && volatility < CALM_VOLATILITY {
        Sentiment::Bearish
    } else if mean < -MILD_MOVE {
        Sentiment::SlightlyBearish
    } else if volatility > HIGH_VOLATILITY {
        Sentiment::Volatile
    } else {
        Sentiment::Neutral
    }
}
