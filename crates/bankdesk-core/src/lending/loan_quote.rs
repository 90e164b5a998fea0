//! Loan quote calculator.
//!
//! Covers:
//! 1. **Rate adjustment** -- lender base rate + category adjustment + long-tenure premium.
//! 2. **EMI** -- level monthly instalment, `P * r * (1+r)^n / ((1+r)^n - 1)`.
//! 3. **Totals** -- total payment, total interest, processing fee.
//! 4. **Schedule** -- lazy amortization sequence via [`LoanQuote::schedule`].
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{
    BankCatalog, LoanCategory, LoanProductTerms, RateAdjustmentPolicy, MAX_LOAN_TERM_YEARS,
};
use crate::error::BankDeskError;
use crate::lending::amortization::{generate_amortization_schedule, AmortizationSchedule};
use crate::time_value::annuity_payment;
use crate::types::{
    monthly_rate_from_annual_percent, percent_of, with_metadata, ComputationOutput, Money,
    Percent, Rate, MONTHS_PER_YEAR,
};
use crate::BankDeskResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// A borrower's request, rebuilt every time an input changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    /// Lender base rate in percent, before adjustments.
    pub annual_rate_percent: Percent,
    pub term_years: u32,
    pub category: LoanCategory,
}

/// Request addressed to a bank in the catalog; the base rate comes from the bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankLoanQuery {
    pub bank_id: String,
    pub principal: Money,
    pub term_years: u32,
    pub category: LoanCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanQuote {
    pub category: LoanCategory,
    pub principal: Money,
    pub base_rate: Percent,
    pub effective_annual_rate: Percent,
    /// Periodic rate actually applied; zero when the linear fallback was used.
    pub monthly_rate: Rate,
    pub periods: u32,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub processing_fee: Money,
    pub processing_fee_percent: Percent,
}

impl LoanQuote {
    /// Full amortization sequence behind this quote.
    pub fn schedule(&self) -> AmortizationSchedule {
        generate_amortization_schedule(
            self.principal,
            self.monthly_rate,
            self.monthly_payment,
            self.periods,
        )
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Effective annual rate in percent, rounded to 2 decimal places.
pub fn effective_annual_rate(
    base_rate: Percent,
    category: LoanCategory,
    term_years: u32,
    policy: &RateAdjustmentPolicy,
) -> Percent {
    (base_rate + policy.category_adjustment(category) + policy.term_adjustment(term_years))
        .round_dp(2)
}

/// Quote a loan against a lender's published terms.
pub fn compute_loan_quote(
    request: &LoanRequest,
    terms: &LoanProductTerms,
    policy: &RateAdjustmentPolicy,
) -> BankDeskResult<ComputationOutput<LoanQuote>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_request(request, terms)?;

    let effective = effective_annual_rate(
        request.annual_rate_percent,
        request.category,
        request.term_years,
        policy,
    );
    let periods = request.term_years * MONTHS_PER_YEAR;
    let mut monthly_rate = monthly_rate_from_annual_percent(effective);

    let monthly_payment = match annuity_payment(request.principal, monthly_rate, periods) {
        Ok(pmt) => pmt,
        Err(BankDeskError::ArithmeticDegenerate { context }) => {
            log::warn!("EMI formula degenerate ({context}); using straight-line repayment");
            warnings.push(format!(
                "Effective rate {effective}% is not positive; EMI falls back to principal / {periods}."
            ));
            monthly_rate = Decimal::ZERO;
            request.principal / Decimal::from(periods)
        }
        Err(e) => return Err(e),
    };

    if monthly_rate.is_zero() && warnings.is_empty() {
        warnings.push("Zero effective rate; EMI is straight-line principal / periods.".into());
    }

    let total_payment = monthly_payment * Decimal::from(periods);
    let total_interest = total_payment - request.principal;
    let processing_fee = percent_of(request.principal, terms.processing_fee_percent);

    log::debug!(
        "loan quote: {} principal={} rate={}% n={} emi={}",
        request.category,
        request.principal,
        effective,
        periods,
        monthly_payment.round_dp(2)
    );

    let output = LoanQuote {
        category: request.category,
        principal: request.principal,
        base_rate: request.annual_rate_percent,
        effective_annual_rate: effective,
        monthly_rate,
        periods,
        monthly_payment,
        total_payment,
        total_interest,
        processing_fee,
        processing_fee_percent: terms.processing_fee_percent,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "category_adjustment": policy.category_adjustment(request.category).to_string(),
        "term_adjustment": policy.term_adjustment(request.term_years).to_string(),
        "long_term_threshold_years": policy.long_term_threshold_years,
        "compounding": "monthly, rate / 1200",
    });

    Ok(with_metadata(
        "Equated Monthly Instalment (reducing balance)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Resolve terms and base rate from the catalog, then quote.
pub fn quote_for_bank(
    catalog: &BankCatalog,
    query: &BankLoanQuery,
) -> BankDeskResult<ComputationOutput<LoanQuote>> {
    let bank = catalog.get(&query.bank_id)?;
    let request = LoanRequest {
        principal: query.principal,
        annual_rate_percent: bank.loan.base_rate,
        term_years: query.term_years,
        category: query.category,
    };
    compute_loan_quote(&request, &bank.loan, &catalog.policy)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_request(request: &LoanRequest, terms: &LoanProductTerms) -> BankDeskResult<()> {
    if request.principal <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if request.annual_rate_percent <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate must be positive.".into(),
        });
    }
    if request.annual_rate_percent > terms.max_rate {
        return Err(BankDeskError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: format!(
                "Annual rate {}% exceeds the lender maximum of {}%.",
                request.annual_rate_percent, terms.max_rate
            ),
        });
    }
    if request.term_years == 0 || request.term_years > MAX_LOAN_TERM_YEARS {
        return Err(BankDeskError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term must be between 1 and {MAX_LOAN_TERM_YEARS} years."),
        });
    }
    if !terms.offers(request.category) {
        return Err(BankDeskError::InvalidInput {
            field: "category".into(),
            reason: format!("Lender does not offer {} loans.", request.category),
        });
    }
    if request.principal < terms.min_amount || request.principal > terms.max_amount {
        return Err(BankDeskError::InvalidInput {
            field: "principal".into(),
            reason: format!(
                "Principal {} outside lender range [{}, {}].",
                request.principal, terms.min_amount, terms.max_amount
            ),
        });
    }
    if request.term_years < terms.min_term_years || request.term_years > terms.max_term_years {
        return Err(BankDeskError::InvalidInput {
            field: "term_years".into(),
            reason: format!(
                "Term {} years outside lender range [{}, {}].",
                request.term_years, terms.min_term_years, terms.max_term_years
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::compound;
    use rust_decimal_macros::dec;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn sbi_terms() -> LoanProductTerms {
        BankCatalog::builtin().banks[0].loan.clone()
    }

    fn home_request(term_years: u32) -> LoanRequest {
        LoanRequest {
            principal: dec!(500_000),
            annual_rate_percent: dec!(8.5),
            term_years,
            category: LoanCategory::Home,
        }
    }

    #[test]
    fn test_home_loan_reference_quote() {
        let policy = RateAdjustmentPolicy::default();
        let out = compute_loan_quote(&home_request(10), &sbi_terms(), &policy).unwrap();
        let q = &out.result;

        assert_eq!(q.effective_annual_rate, dec!(8.00));
        assert_eq!(q.periods, 120);
        assert!(approx_eq(q.monthly_rate, dec!(0.006667), dec!(0.000001)));

        // Recompute the formula independently
        let r = dec!(8) / dec!(1200);
        let f = compound(r, 120);
        let expected = dec!(500_000) * r * f / (f - Decimal::ONE);
        assert!(approx_eq(q.monthly_payment, expected, dec!(0.000001)));
        assert_eq!(q.monthly_payment.round(), dec!(6066));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_totals_are_consistent() {
        let policy = RateAdjustmentPolicy::default();
        let q = compute_loan_quote(&home_request(20), &sbi_terms(), &policy)
            .unwrap()
            .result;
        assert!(approx_eq(
            q.monthly_payment * Decimal::from(q.periods),
            q.total_payment,
            dec!(0.0001)
        ));
        assert!(approx_eq(
            q.total_payment - q.principal,
            q.total_interest,
            dec!(0.0001)
        ));
        // 0.5% of 5,00,000
        assert_eq!(q.processing_fee, dec!(2500));
    }

    #[test]
    fn test_long_term_premium() {
        let policy = RateAdjustmentPolicy::default();
        let q = compute_loan_quote(&home_request(20), &sbi_terms(), &policy)
            .unwrap()
            .result;
        assert_eq!(q.effective_annual_rate, dec!(8.25));
    }

    #[test]
    fn test_longer_term_lowers_emi() {
        let policy = RateAdjustmentPolicy::default();
        let terms = sbi_terms();
        let mut previous = Decimal::MAX;
        for years in [5u32, 10, 15, 20, 25, 30] {
            let q = compute_loan_quote(&home_request(years), &terms, &policy)
                .unwrap()
                .result;
            assert!(q.monthly_payment < previous, "EMI did not fall at {years} years");
            previous = q.monthly_payment;
        }
    }

    #[test]
    fn test_home_cheaper_than_personal() {
        let policy = RateAdjustmentPolicy::default();
        for years in [1u32, 10, 16, 30] {
            let home = effective_annual_rate(dec!(8.5), LoanCategory::Home, years, &policy);
            let personal = effective_annual_rate(dec!(8.5), LoanCategory::Personal, years, &policy);
            assert!(home < personal);
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        let policy = RateAdjustmentPolicy::default();
        let err = compute_loan_quote(&home_request(0), &sbi_terms(), &policy).unwrap_err();
        match err {
            BankDeskError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_principal_rejected() {
        let policy = RateAdjustmentPolicy::default();
        let mut req = home_request(10);
        req.principal = dec!(50_000);
        assert_eq!(
            compute_loan_quote(&req, &sbi_terms(), &policy)
                .unwrap_err()
                .code(),
            "INVALID_INPUT"
        );
        req.principal = dec!(6_000_000);
        assert!(compute_loan_quote(&req, &sbi_terms(), &policy).is_err());
    }

    #[test]
    fn test_term_above_lender_max_rejected() {
        let policy = RateAdjustmentPolicy::default();
        let terms = BankCatalog::builtin().get("AXISBANK").unwrap().loan.clone();
        let mut req = home_request(30);
        req.annual_rate_percent = terms.base_rate;
        assert!(compute_loan_quote(&req, &terms, &policy).is_err());
    }

    #[test]
    fn test_term_beyond_any_lender_rejected() {
        // Terms passed straight in, bypassing catalog validation
        let mut terms = sbi_terms();
        terms.max_term_years = u32::MAX;
        let err = compute_loan_quote(
            &home_request(u32::MAX / 6),
            &terms,
            &RateAdjustmentPolicy::default(),
        )
        .unwrap_err();
        match err {
            BankDeskError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_category_not_offered_rejected() {
        let policy = RateAdjustmentPolicy::default();
        let mut req = home_request(5);
        req.category = LoanCategory::Gold;
        let err = compute_loan_quote(&req, &sbi_terms(), &policy).unwrap_err();
        assert!(err.to_string().contains("gold"));
    }

    #[test]
    fn test_degenerate_rate_falls_back_to_linear() {
        let mut policy = RateAdjustmentPolicy::default();
        policy
            .category_adjustments
            .insert(LoanCategory::Home, dec!(-9));
        let out = compute_loan_quote(&home_request(10), &sbi_terms(), &policy).unwrap();
        let q = &out.result;
        assert_eq!(q.effective_annual_rate, dec!(-0.5));
        assert_eq!(q.monthly_rate, Decimal::ZERO);
        assert!(approx_eq(q.monthly_payment, dec!(500_000) / dec!(120), dec!(0.0001)));
        assert!(approx_eq(q.total_interest, Decimal::ZERO, dec!(0.0001)));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_zero_effective_rate_is_linear() {
        let mut policy = RateAdjustmentPolicy::default();
        policy
            .category_adjustments
            .insert(LoanCategory::Home, dec!(-8.5));
        let out = compute_loan_quote(&home_request(10), &sbi_terms(), &policy).unwrap();
        assert_eq!(out.result.effective_annual_rate, Decimal::ZERO);
        assert!(approx_eq(
            out.result.monthly_payment,
            dec!(500_000) / dec!(120),
            dec!(0.0001)
        ));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_quote_schedule_matches_quote() {
        let policy = RateAdjustmentPolicy::default();
        let q = compute_loan_quote(&home_request(10), &sbi_terms(), &policy)
            .unwrap()
            .result;
        let schedule = q.schedule();
        assert_eq!(schedule.len(), 120);
        let totals = schedule.totals();
        assert!(approx_eq(totals.total_interest, q.total_interest, dec!(0.01)));
    }

    #[test]
    fn test_quote_for_bank_uses_catalog_base_rate() {
        let catalog = BankCatalog::builtin();
        let query = BankLoanQuery {
            bank_id: "HDFCBANK.NS".into(),
            principal: dec!(1_000_000),
            term_years: 5,
            category: LoanCategory::Personal,
        };
        let q = quote_for_bank(&catalog, &query).unwrap().result;
        assert_eq!(q.base_rate, dec!(8.35));
        assert_eq!(q.effective_annual_rate, dec!(9.85));
        assert_eq!(q.processing_fee, dec!(6000));
    }

    #[test]
    fn test_quote_for_unknown_bank() {
        let catalog = BankCatalog::builtin();
        let query = BankLoanQuery {
            bank_id: "YESBANK.NS".into(),
            principal: dec!(1_000_000),
            term_years: 5,
            category: LoanCategory::Home,
        };
        assert_eq!(
            quote_for_bank(&catalog, &query).unwrap_err().code(),
            "UNKNOWN_BANK"
        );
    }
}
