//! Fixed-deposit quotes.
//!
//! Rates come from the lender's tenure slabs. Interest compounds quarterly on
//! whole quarters (365 / 4 days each); the leftover days earn simple interest
//! on the compounded amount.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{BankCatalog, FdRateSlab, MAX_FD_TENURE_DAYS};
use crate::error::BankDeskError;
use crate::time_value::{compound, future_value};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankDeskResult;

const DAYS_PER_YEAR: Decimal = dec!(365);
const DAYS_PER_QUARTER: Decimal = dec!(91.25);
const QUARTERS_PER_YEAR: u32 = 4;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDepositInput {
    pub principal: Money,
    pub tenure_days: u32,
    #[serde(default)]
    pub senior_citizen: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDepositQuery {
    pub bank_id: String,
    pub principal: Money,
    pub tenure_days: u32,
    #[serde(default)]
    pub senior_citizen: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDepositOutput {
    pub slab: String,
    pub rate_applied: Percent,
    pub principal: Money,
    pub maturity_amount: Money,
    pub interest_earned: Money,
    /// Annual yield of the quoted rate after quarterly compounding.
    pub effective_annual_yield: Percent,
    pub full_quarters: u32,
    pub residual_days: Decimal,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Quote a deposit against a slab table.
pub fn quote_fixed_deposit(
    input: &FixedDepositInput,
    slabs: &[FdRateSlab],
) -> BankDeskResult<ComputationOutput<FixedDepositOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "principal".into(),
            reason: "Deposit amount must be positive.".into(),
        });
    }
    if input.tenure_days == 0 || input.tenure_days > MAX_FD_TENURE_DAYS {
        return Err(BankDeskError::InvalidInput {
            field: "tenure_days".into(),
            reason: format!("Tenure must be between 1 and {MAX_FD_TENURE_DAYS} days."),
        });
    }

    let slab = slabs
        .iter()
        .find(|s| s.contains(input.tenure_days))
        .ok_or_else(|| BankDeskError::InvalidInput {
            field: "tenure_days".into(),
            reason: format!("No rate slab covers a tenure of {} days.", input.tenure_days),
        })?;

    let rate = if input.senior_citizen {
        slab.senior_rate
    } else {
        slab.regular_rate
    };

    // floor(days / 91.25) without leaving integer arithmetic
    let quarters = input.tenure_days * QUARTERS_PER_YEAR / 365;
    let residual_days =
        Decimal::from(input.tenure_days) - Decimal::from(quarters) * DAYS_PER_QUARTER;
    let quarterly_rate = rate / dec!(400);

    let compounded = future_value(input.principal, quarterly_rate, quarters);
    let maturity_amount =
        compounded * (Decimal::ONE + rate / Decimal::ONE_HUNDRED * residual_days / DAYS_PER_YEAR);
    let interest_earned = maturity_amount - input.principal;
    let effective_annual_yield =
        (compound(quarterly_rate, QUARTERS_PER_YEAR) - Decimal::ONE) * Decimal::ONE_HUNDRED;

    if quarters == 0 {
        warnings.push("Tenure shorter than one quarter; interest is simple, not compounded.".into());
    }

    log::debug!(
        "fd quote: principal={} days={} rate={}% maturity={}",
        input.principal,
        input.tenure_days,
        rate,
        maturity_amount.round_dp(2)
    );

    let output = FixedDepositOutput {
        slab: slab.label(),
        rate_applied: rate,
        principal: input.principal,
        maturity_amount,
        interest_earned,
        effective_annual_yield,
        full_quarters: quarters,
        residual_days,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "quarterly",
        "days_per_year": 365,
        "senior_citizen": input.senior_citizen,
    });

    Ok(with_metadata(
        "Fixed deposit maturity (quarterly compounding)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Quote a deposit at a catalog bank.
pub fn quote_fixed_deposit_for_bank(
    catalog: &BankCatalog,
    query: &FixedDepositQuery,
) -> BankDeskResult<ComputationOutput<FixedDepositOutput>> {
    let bank = catalog.get(&query.bank_id)?;
    if bank.fd_rates.is_empty() {
        return Err(BankDeskError::InsufficientData(format!(
            "{} publishes no fixed-deposit rates.",
            bank.name
        )));
    }
    let input = FixedDepositInput {
        principal: query.principal,
        tenure_days: query.tenure_days,
        senior_citizen: query.senior_citizen,
    };
    quote_fixed_deposit(&input, &bank.fd_rates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn sbi_slabs() -> Vec<FdRateSlab> {
        BankCatalog::builtin().banks[0].fd_rates.clone()
    }

    #[test]
    fn test_one_year_regular() {
        let input = FixedDepositInput {
            principal: dec!(100_000),
            tenure_days: 365,
            senior_citizen: false,
        };
        let out = quote_fixed_deposit(&input, &sbi_slabs()).unwrap().result;
        assert_eq!(out.slab, "1-2 years");
        assert_eq!(out.rate_applied, dec!(5.50));
        assert_eq!(out.full_quarters, 4);
        assert_eq!(out.residual_days, Decimal::ZERO);
        assert!(approx_eq(out.maturity_amount, dec!(105_614.48), dec!(0.01)));
        assert!(approx_eq(out.effective_annual_yield, dec!(5.6145), dec!(0.0001)));
    }

    #[test]
    fn test_senior_citizen_rate() {
        let input = FixedDepositInput {
            principal: dec!(100_000),
            tenure_days: 365,
            senior_citizen: true,
        };
        let out = quote_fixed_deposit(&input, &sbi_slabs()).unwrap().result;
        assert_eq!(out.rate_applied, dec!(6.00));
        assert!(approx_eq(out.maturity_amount, dec!(106_136.36), dec!(0.01)));
    }

    #[test]
    fn test_residual_days_earn_simple_interest() {
        let input = FixedDepositInput {
            principal: dec!(100_000),
            tenure_days: 180,
            senior_citizen: false,
        };
        let out = quote_fixed_deposit(&input, &sbi_slabs()).unwrap().result;
        assert_eq!(out.full_quarters, 1);
        assert_eq!(out.residual_days, dec!(88.75));
        assert!(approx_eq(out.maturity_amount, dec!(102_605.80), dec!(0.01)));
    }

    #[test]
    fn test_short_tenure_warns() {
        let input = FixedDepositInput {
            principal: dec!(100_000),
            tenure_days: 30,
            senior_citizen: false,
        };
        let out = quote_fixed_deposit(&input, &sbi_slabs()).unwrap();
        assert_eq!(out.result.full_quarters, 0);
        assert!(approx_eq(out.result.maturity_amount, dec!(100_246.58), dec!(0.01)));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_uncovered_tenure_rejected() {
        let input = FixedDepositInput {
            principal: dec!(100_000),
            tenure_days: 3,
            senior_citizen: false,
        };
        let err = quote_fixed_deposit(&input, &sbi_slabs()).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_tenure_beyond_limit_rejected_before_slab_lookup() {
        let open_ended = vec![FdRateSlab {
            min_days: 7,
            max_days: u32::MAX,
            regular_rate: dec!(7),
            senior_rate: dec!(7.5),
        }];
        let input = FixedDepositInput {
            principal: dec!(100_000),
            tenure_days: u32::MAX,
            senior_citizen: false,
        };
        match quote_fixed_deposit(&input, &open_ended).unwrap_err() {
            BankDeskError::InvalidInput { field, .. } => assert_eq!(field, "tenure_days"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_for_bank_lookup() {
        let catalog = BankCatalog::builtin();
        let query = FixedDepositQuery {
            bank_id: "HDFCBANK".into(),
            principal: dec!(50_000),
            tenure_days: 1000,
            senior_citizen: false,
        };
        let out = quote_fixed_deposit_for_bank(&catalog, &query).unwrap().result;
        assert_eq!(out.slab, "2-3 years");
        assert_eq!(out.rate_applied, dec!(6.10));
        assert!(out.interest_earned > Decimal::ZERO);
    }
}
