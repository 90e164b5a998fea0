//! One-day parametric (variance-covariance) Value at Risk.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::time::Instant;

use crate::error::BankDeskError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankDeskResult;

fn default_confidence() -> Decimal {
    dec!(0.95)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParametricVarInput {
    /// Periodic returns in percent.
    pub returns: Vec<Percent>,
    #[serde(default = "default_confidence")]
    pub confidence: Decimal,
    #[serde(default)]
    pub position_value: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParametricVarOutput {
    pub confidence: Decimal,
    pub observations: usize,
    pub mean_return: Percent,
    /// Sample standard deviation of returns.
    pub std_dev: Percent,
    pub z_score: Decimal,
    /// Loss threshold as a percent of position value.
    pub var_pct: Percent,
    pub var_amount: Option<Money>,
}

pub fn parametric_var(
    input: &ParametricVarInput,
) -> BankDeskResult<ComputationOutput<ParametricVarOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.confidence <= dec!(0.5) || input.confidence >= Decimal::ONE {
        return Err(BankDeskError::InvalidInput {
            field: "confidence".into(),
            reason: "Confidence must lie strictly between 0.5 and 1.".into(),
        });
    }
    if input.returns.len() < 2 {
        return Err(BankDeskError::InsufficientData(
            "At least two returns are needed for a standard deviation.".into(),
        ));
    }
    if let Some(value) = input.position_value {
        if value <= Decimal::ZERO {
            return Err(BankDeskError::InvalidInput {
                field: "position_value".into(),
                reason: "Position value must be positive.".into(),
            });
        }
    }

    let n = Decimal::from(input.returns.len());
    let mean = input.returns.iter().copied().sum::<Decimal>() / n;
    let variance = input
        .returns
        .iter()
        .map(|r| (*r - mean) * (*r - mean))
        .sum::<Decimal>()
        / (n - Decimal::ONE);
    let std_dev = variance.sqrt().unwrap_or(Decimal::ZERO);

    let z_score = standard_normal_quantile(input.confidence)?;

    let var_pct = (z_score * std_dev - mean).max(Decimal::ZERO);
    let var_amount = input
        .position_value
        .map(|value| (value * var_pct / Decimal::ONE_HUNDRED).round_dp(2));

    if input.returns.len() < 30 {
        warnings.push(format!(
            "{} observations is a thin sample for a normal approximation.",
            input.returns.len()
        ));
    }
    if std_dev.is_zero() {
        warnings.push("Returns show no dispersion; VaR is zero.".into());
    }

    let output = ParametricVarOutput {
        confidence: input.confidence,
        observations: input.returns.len(),
        mean_return: mean.round_dp(6),
        std_dev: std_dev.round_dp(6),
        z_score,
        var_pct: var_pct.round_dp(6),
        var_amount,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "distribution": "normal",
        "std_dev": "sample (n - 1)",
        "horizon": "one period",
    });

    Ok(with_metadata(
        "Parametric Value at Risk (variance-covariance)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// The only f64 in the crate: statrs works in floating point.
fn standard_normal_quantile(p: Decimal) -> BankDeskResult<Decimal> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| BankDeskError::ArithmeticDegenerate {
        context: format!("standard normal: {e}"),
    })?;
    let p = p.to_f64().ok_or_else(|| BankDeskError::InvalidInput {
        field: "confidence".into(),
        reason: "Confidence is not representable as a float.".into(),
    })?;
    Decimal::from_f64(normal.inverse_cdf(p))
        .map(|z| z.round_dp(6))
        .ok_or_else(|| BankDeskError::ArithmeticDegenerate {
            context: format!("inverse normal CDF at {p}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn sample_returns() -> Vec<Decimal> {
        vec![dec!(1), dec!(-1), dec!(2), dec!(-2), dec!(0)]
    }

    #[test]
    fn test_z_scores() {
        assert!(approx_eq(
            standard_normal_quantile(dec!(0.95)).unwrap(),
            dec!(1.644854),
            dec!(0.000002)
        ));
        assert!(approx_eq(
            standard_normal_quantile(dec!(0.99)).unwrap(),
            dec!(2.326348),
            dec!(0.000002)
        ));
    }

    #[test]
    fn test_var_with_position() {
        let input = ParametricVarInput {
            returns: sample_returns(),
            confidence: dec!(0.95),
            position_value: Some(dec!(1_000_000)),
        };
        let out = parametric_var(&input).unwrap().result;
        // sample variance = 10 / 4
        assert!(approx_eq(out.std_dev, dec!(1.581139), dec!(0.000001)));
        assert_eq!(out.mean_return, Decimal::ZERO);
        assert!(approx_eq(out.var_pct, dec!(2.600743), dec!(0.00001)));
        let amount = out.var_amount.unwrap();
        assert!(approx_eq(amount, dec!(26_007.43), dec!(0.1)));
    }

    #[test]
    fn test_strong_drift_floors_at_zero() {
        let input = ParametricVarInput {
            returns: vec![dec!(10), dec!(10.1), dec!(9.9)],
            confidence: dec!(0.95),
            position_value: None,
        };
        let out = parametric_var(&input).unwrap().result;
        assert_eq!(out.var_pct, Decimal::ZERO);
        assert!(out.var_amount.is_none());
    }

    #[test]
    fn test_confidence_bounds() {
        for c in [dec!(0.5), dec!(1), dec!(0.3)] {
            let input = ParametricVarInput {
                returns: sample_returns(),
                confidence: c,
                position_value: None,
            };
            assert_eq!(parametric_var(&input).unwrap_err().code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn test_single_return_rejected() {
        let input = ParametricVarInput {
            returns: vec![dec!(1)],
            confidence: dec!(0.95),
            position_value: None,
        };
        assert_eq!(parametric_var(&input).unwrap_err().code(), "INSUFFICIENT_DATA");
    }
}
