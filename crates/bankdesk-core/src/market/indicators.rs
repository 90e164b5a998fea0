//! Technical indicators on a closing-price series.
//!
//! Every series returned is aligned with the input: position `i` describes
//! close `i`, and is `None` until enough history exists.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BankDeskError;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::BankDeskResult;

const OVERBOUGHT: Decimal = dec!(70);
const OVERSOLD: Decimal = dec!(30);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

fn default_sma_window() -> usize {
    20
}
fn default_rsi_period() -> usize {
    14
}
fn default_band_window() -> usize {
    20
}
fn default_band_width() -> Decimal {
    dec!(2)
}
fn default_macd_fast() -> usize {
    12
}
fn default_macd_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorInput {
    pub closes: Vec<Money>,
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_band_window")]
    pub band_window: usize,
    /// Band half-width in standard deviations.
    #[serde(default = "default_band_width")]
    pub band_width: Decimal,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

impl IndicatorInput {
    pub fn new(closes: Vec<Money>) -> Self {
        IndicatorInput {
            closes,
            sma_window: default_sma_window(),
            rsi_period: default_rsi_period(),
            band_window: default_band_window(),
            band_width: default_band_width(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerBands {
    pub middle: Vec<Option<Decimal>>,
    pub upper: Vec<Option<Decimal>>,
    pub lower: Vec<Option<Decimal>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macd {
    pub macd: Vec<Decimal>,
    pub signal: Vec<Decimal>,
    pub histogram: Vec<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

/// The indicators at the most recent close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub close: Money,
    pub sma: Option<Decimal>,
    pub rsi: Option<Decimal>,
    pub rsi_zone: Option<RsiZone>,
    pub upper_band: Option<Decimal>,
    pub lower_band: Option<Decimal>,
    pub macd: Decimal,
    pub macd_signal: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorOutput {
    pub observations: usize,
    pub latest: IndicatorSnapshot,
    pub sma: Vec<Option<Decimal>>,
    pub rsi: Vec<Option<Decimal>>,
    pub bollinger: BollingerBands,
    pub macd: Macd,
}

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Simple moving average over `window` closes.
pub fn sma(values: &[Decimal], window: usize) -> BankDeskResult<Vec<Option<Decimal>>> {
    require_window("sma_window", window)?;
    let divisor = Decimal::from(window);
    Ok((0..values.len())
        .map(|i| {
            trailing(values, i, window).map(|w| w.iter().copied().sum::<Decimal>() / divisor)
        })
        .collect())
}

/// Relative strength index with simple averages of gains and losses over
/// the last `period` price changes.
pub fn rsi(closes: &[Decimal], period: usize) -> BankDeskResult<Vec<Option<Decimal>>> {
    require_window("rsi_period", period)?;
    let divisor = Decimal::from(period);
    Ok((0..closes.len())
        .map(|i| {
            if i < period {
                return None;
            }
            let (gains, losses) = closes[i - period..=i].windows(2).fold(
                (Decimal::ZERO, Decimal::ZERO),
                |(g, l), pair| {
                    let delta = pair[1] - pair[0];
                    if delta > Decimal::ZERO {
                        (g + delta, l)
                    } else {
                        (g, l - delta)
                    }
                },
            );
            let avg_gain = gains / divisor;
            let avg_loss = losses / divisor;
            let value = if avg_loss.is_zero() {
                // a flat window reads as neither side in control
                if avg_gain.is_zero() {
                    dec!(50)
                } else {
                    Decimal::ONE_HUNDRED
                }
            } else {
                let rs = avg_gain / avg_loss;
                Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs)
            };
            Some(value.round_dp(4))
        })
        .collect())
}

/// Moving average plus and minus `width` sample standard deviations.
pub fn bollinger_bands(
    closes: &[Decimal],
    window: usize,
    width: Decimal,
) -> BankDeskResult<BollingerBands> {
    if window < 2 {
        return Err(BankDeskError::InvalidInput {
            field: "band_window".into(),
            reason: "Band window needs at least two closes.".into(),
        });
    }
    if width <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "band_width".into(),
            reason: "Band width must be positive.".into(),
        });
    }

    let middle = sma(closes, window)?;
    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());
    for (i, mean) in middle.iter().enumerate() {
        match (*mean, trailing(closes, i, window)) {
            (Some(mean), Some(w)) => {
                let variance = w.iter().map(|c| (*c - mean) * (*c - mean)).sum::<Decimal>()
                    / Decimal::from(window - 1);
                let sd = variance.sqrt().unwrap_or(Decimal::ZERO);
                upper.push(Some(mean + width * sd));
                lower.push(Some(mean - width * sd));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    Ok(BollingerBands {
        middle,
        upper,
        lower,
    })
}

/// MACD line (fast EMA minus slow EMA), its signal EMA and the histogram.
pub fn macd(closes: &[Decimal], fast: usize, slow: usize, signal: usize) -> BankDeskResult<Macd> {
    require_window("macd_fast", fast)?;
    require_window("macd_slow", slow)?;
    require_window("macd_signal", signal)?;
    if fast >= slow {
        return Err(BankDeskError::InvalidInput {
            field: "macd_fast".into(),
            reason: "Fast span must be shorter than the slow span.".into(),
        });
    }

    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let macd_line: Vec<Decimal> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| *f - *s)
        .collect();
    let signal_line = ema(&macd_line, signal);
    let histogram = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| *m - *s)
        .collect();

    Ok(Macd {
        macd: macd_line,
        signal: signal_line,
        histogram,
    })
}

/// Exponentially weighted mean with alpha = 2 / (span + 1), weights
/// normalised over the history seen so far.
pub fn ema(values: &[Decimal], span: usize) -> Vec<Decimal> {
    let decay = Decimal::ONE - dec!(2) / Decimal::from(span + 1);
    let mut weighted = Decimal::ZERO;
    let mut weight = Decimal::ZERO;
    values
        .iter()
        .map(|v| {
            weighted = *v + decay * weighted;
            weight = Decimal::ONE + decay * weight;
            weighted / weight
        })
        .collect()
}

/// All indicators at once, with a snapshot of the latest close.
pub fn compute_indicators(
    input: &IndicatorInput,
) -> BankDeskResult<ComputationOutput<IndicatorOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let closes = &input.closes;
    let last_close = closes
        .last()
        .copied()
        .ok_or_else(|| BankDeskError::InsufficientData("No closing prices supplied.".into()))?;
    if closes.iter().any(|c| *c <= Decimal::ZERO) {
        return Err(BankDeskError::InvalidInput {
            field: "closes".into(),
            reason: "Closing prices must be positive.".into(),
        });
    }

    let sma_series = sma(closes, input.sma_window)?;
    let rsi_series = rsi(closes, input.rsi_period)?;
    let bands = bollinger_bands(closes, input.band_window, input.band_width)?;
    let macd_out = macd(closes, input.macd_fast, input.macd_slow, input.macd_signal)?;

    let longest = input.sma_window.max(input.band_window).max(input.rsi_period + 1);
    if closes.len() < longest {
        warnings.push(format!(
            "{} closes is shorter than the longest window ({longest}); some indicators are empty.",
            closes.len()
        ));
    }
    if closes.len() < input.macd_slow {
        warnings.push("MACD is still warming up over this history.".into());
    }

    let last = |series: &Vec<Option<Decimal>>| series.last().copied().flatten();
    let latest_rsi = last(&rsi_series);
    let latest = IndicatorSnapshot {
        close: last_close,
        sma: last(&sma_series),
        rsi: latest_rsi,
        rsi_zone: latest_rsi.map(|v| {
            if v > OVERBOUGHT {
                RsiZone::Overbought
            } else if v < OVERSOLD {
                RsiZone::Oversold
            } else {
                RsiZone::Neutral
            }
        }),
        upper_band: last(&bands.upper),
        lower_band: last(&bands.lower),
        macd: macd_out.macd.last().copied().unwrap_or(Decimal::ZERO),
        macd_signal: macd_out.signal.last().copied().unwrap_or(Decimal::ZERO),
    };

    log::debug!(
        "indicators over {} closes: rsi={:?} macd={}",
        closes.len(),
        latest.rsi,
        latest.macd
    );

    let output = IndicatorOutput {
        observations: closes.len(),
        latest,
        sma: sma_series,
        rsi: rsi_series,
        bollinger: bands,
        macd: macd_out,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "sma_window": input.sma_window,
        "rsi_period": input.rsi_period,
        "band_window": input.band_window,
        "band_width": input.band_width.to_string(),
        "macd": [input.macd_fast, input.macd_slow, input.macd_signal],
    });

    Ok(with_metadata(
        "SMA, RSI, Bollinger Bands and MACD on closing prices",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn trailing(values: &[Decimal], i: usize, window: usize) -> Option<&[Decimal]> {
    if i + 1 < window {
        None
    } else {
        Some(&values[i + 1 - window..=i])
    }
}

fn require_window(field: &str, window: usize) -> BankDeskResult<()> {
    if window == 0 {
        return Err(BankDeskError::InvalidInput {
            field: field.into(),
            reason: "Window must be at least one observation.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
