//! Amortization schedules for level-payment (EMI) loans.
//!
//! The schedule is a small `Copy` value describing the loan; rows are produced
//! lazily by [`AmortizationSchedule::iter`], and every call starts again from
//! period 1. Callers that only display the first year simply `take(12)`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::error::BankDeskError;
use crate::types::{Money, Rate, MONTHS_PER_YEAR};
use crate::BankDeskResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One instalment of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub principal_component: Money,
    pub interest_component: Money,
    pub remaining_balance: Money,
}

/// Raw schedule parameters, as accepted from JSON callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    pub periods: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    principal: Money,
    monthly_rate: Rate,
    monthly_payment: Money,
    periods: u32,
}

/// Totals over the whole schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub periods: u32,
    pub total_principal: Money,
    pub total_interest: Money,
    pub final_balance: Money,
}

/// Principal and interest paid within one loan year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Describe the schedule for a loan of `principal` repaid in `periods`
/// instalments of `monthly_payment` at `monthly_rate`. No rows are computed here.
pub fn generate_amortization_schedule(
    principal: Money,
    monthly_rate: Rate,
    monthly_payment: Money,
    periods: u32,
) -> AmortizationSchedule {
    AmortizationSchedule {
        principal,
        monthly_rate,
        monthly_payment,
        periods,
    }
}

/// Validated construction from caller-supplied parameters.
pub fn build_schedule(input: &AmortizationInput) -> BankDeskResult<AmortizationSchedule> {
    if input.principal <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if input.monthly_rate < Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Monthly rate cannot be negative.".into(),
        });
    }
    if input.monthly_payment <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "monthly_payment".into(),
            reason: "Monthly payment must be positive.".into(),
        });
    }
    if input.periods == 0 {
        return Err(BankDeskError::InvalidInput {
            field: "periods".into(),
            reason: "At least one period is required.".into(),
        });
    }
    if input.monthly_rate > Decimal::ZERO {
        // An instalment at or below the first month's interest never retires principal
        let first_interest = input.principal.checked_mul(input.monthly_rate);
        if first_interest.map_or(true, |interest| input.monthly_payment <= interest) {
            return Err(BankDeskError::InvalidInput {
                field: "monthly_payment".into(),
                reason: format!(
                    "Monthly payment {} does not cover the first month's interest on {} at {} per month.",
                    input.monthly_payment, input.principal, input.monthly_rate
                ),
            });
        }
    }
    Ok(generate_amortization_schedule(
        input.principal,
        input.monthly_rate,
        input.monthly_payment,
        input.periods,
    ))
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

impl AmortizationSchedule {
    pub fn iter(&self) -> AmortizationIter {
        AmortizationIter {
            schedule: *self,
            balance: self.principal,
            next_period: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.periods as usize
    }

    pub fn is_empty(&self) -> bool {
        self.periods == 0
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }

    pub fn monthly_payment(&self) -> Money {
        self.monthly_payment
    }

    pub fn rows(&self) -> Vec<AmortizationRow> {
        self.iter().collect()
    }

    pub fn totals(&self) -> ScheduleTotals {
        let mut total_principal = Decimal::ZERO;
        let mut total_interest = Decimal::ZERO;
        let mut final_balance = self.principal;
        for row in self.iter() {
            total_principal += row.principal_component;
            total_interest += row.interest_component;
            final_balance = row.remaining_balance;
        }
        ScheduleTotals {
            periods: self.periods,
            total_principal,
            total_interest,
            final_balance,
        }
    }

    /// Roll the monthly rows up into loan years. A trailing partial year is kept.
    pub fn yearly_summary(&self) -> Vec<YearSummary> {
        let mut years: Vec<YearSummary> = Vec::new();
        for row in self.iter() {
            let year = (row.period - 1) / MONTHS_PER_YEAR + 1;
            match years.last_mut() {
                Some(summary) if summary.year == year => {
                    summary.principal_paid += row.principal_component;
                    summary.interest_paid += row.interest_component;
                    summary.closing_balance = row.remaining_balance;
                }
                _ => years.push(YearSummary {
                    year,
                    principal_paid: row.principal_component,
                    interest_paid: row.interest_component,
                    closing_balance: row.remaining_balance,
                }),
            }
        }
        years
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = AmortizationRow;
    type IntoIter = AmortizationIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy row generator. Interest accrues on the running balance, the rest of
/// the instalment retires principal, and the balance never goes below zero.
#[derive(Debug, Clone)]
pub struct AmortizationIter {
    schedule: AmortizationSchedule,
    balance: Money,
    next_period: u32,
}

impl Iterator for AmortizationIter {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_period > self.schedule.periods {
            return None;
        }

        let step = self
            .balance
            .checked_mul(self.schedule.monthly_rate)
            .and_then(|interest| {
                let principal = self.schedule.monthly_payment.checked_sub(interest)?;
                let balance = self.balance.checked_sub(principal)?;
                Some((interest, principal, balance))
            });
        let Some((interest_component, principal_component, balance)) = step else {
            // Unvalidated parameters whose balance outgrows Decimal end the schedule here
            self.next_period = self.schedule.periods.saturating_add(1);
            return None;
        };
        self.balance = balance.max(Decimal::ZERO);

        let row = AmortizationRow {
            period: self.next_period,
            principal_component,
            interest_component,
            remaining_balance: self.balance,
        };
        self.next_period += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .schedule
            .periods
            .saturating_add(1)
            .saturating_sub(self.next_period) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AmortizationIter {}

impl FusedIterator for AmortizationIter {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::annuity_payment;
    use rust_decimal_macros::dec;

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    fn ten_year_schedule() -> AmortizationSchedule {
        let principal = dec!(500_000);
        let rate = dec!(8) / dec!(1200);
        let pmt = annuity_payment(principal, rate, 120).unwrap();
        generate_amortization_schedule(principal, rate, pmt, 120)
    }

    #[test]
    fn test_first_row_splits_payment() {
        let schedule = ten_year_schedule();
        let first = schedule.iter().next().unwrap();
        assert_eq!(first.period, 1);
        // 500,000 * 0.08 / 12 = 3,333.33 interest in month one
        assert!(approx_eq(first.interest_component, dec!(3333.33), dec!(0.01)));
        assert!(approx_eq(
            first.principal_component + first.interest_component,
            schedule.monthly_payment(),
            dec!(0.0000001)
        ));
    }

    #[test]
    fn test_principal_components_sum_to_principal() {
        let totals = ten_year_schedule().totals();
        assert_eq!(totals.periods, 120);
        assert!(approx_eq(totals.total_principal, dec!(500_000), dec!(0.01)));
        assert!(approx_eq(totals.final_balance, Decimal::ZERO, dec!(0.01)));
    }

    #[test]
    fn test_schedule_is_restartable() {
        let schedule = ten_year_schedule();
        let first_pass: Vec<AmortizationRow> = schedule.iter().take(12).collect();
        let second_pass: Vec<AmortizationRow> = schedule.iter().take(12).collect();
        assert_eq!(first_pass, second_pass);
        assert_eq!(schedule.iter().count(), 120);
    }

    #[test]
    fn test_exact_size() {
        let schedule = ten_year_schedule();
        let mut iter = schedule.iter();
        assert_eq!(iter.len(), 120);
        iter.next();
        assert_eq!(iter.len(), 119);
    }

    #[test]
    fn test_balance_is_monotone_and_floored() {
        let schedule = ten_year_schedule();
        let mut previous = schedule.principal();
        for row in &schedule {
            assert!(row.remaining_balance <= previous);
            assert!(row.remaining_balance >= Decimal::ZERO);
            previous = row.remaining_balance;
        }
    }

    #[test]
    fn test_overpayment_floors_balance_at_zero() {
        let schedule = generate_amortization_schedule(dec!(1000), dec!(0.01), dec!(600), 3);
        let rows = schedule.rows();
        assert_eq!(rows[1].remaining_balance, Decimal::ZERO);
        assert_eq!(rows[2].remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_yearly_summary() {
        let schedule = ten_year_schedule();
        let years = schedule.yearly_summary();
        assert_eq!(years.len(), 10);
        assert_eq!(years[0].year, 1);
        // Interest share falls over the life of the loan
        assert!(years[0].interest_paid > years[9].interest_paid);
        let principal: Decimal = years.iter().map(|y| y.principal_paid).sum();
        assert!(approx_eq(principal, dec!(500_000), dec!(0.01)));
    }

    #[test]
    fn test_partial_final_year_kept() {
        let schedule = generate_amortization_schedule(dec!(12_000), Decimal::ZERO, dec!(1000), 12 + 6);
        let years = schedule.yearly_summary();
        assert_eq!(years.len(), 2);
        assert_eq!(years[1].principal_paid, dec!(6000));
    }

    #[test]
    fn test_build_schedule_validation() {
        let bad = AmortizationInput {
            principal: dec!(100_000),
            monthly_rate: dec!(0.01),
            monthly_payment: dec!(2000),
            periods: 0,
        };
        assert_eq!(build_schedule(&bad).unwrap_err().code(), "INVALID_INPUT");
    }

    #[test]
    fn test_payment_below_first_interest_rejected() {
        // 10 lakh at 100% a month accrues 10 lakh of interest against a payment of 1
        let input = AmortizationInput {
            principal: dec!(1_000_000),
            monthly_rate: dec!(1),
            monthly_payment: dec!(1),
            periods: 120,
        };
        match build_schedule(&input).unwrap_err() {
            BankDeskError::InvalidInput { field, .. } => assert_eq!(field, "monthly_payment"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        // Paying exactly the interest leaves the balance where it started
        let interest_only = AmortizationInput {
            monthly_payment: dec!(10_000),
            monthly_rate: dec!(0.01),
            ..input.clone()
        };
        assert!(build_schedule(&interest_only).is_err());

        let amortizing = AmortizationInput {
            monthly_payment: dec!(15_000),
            monthly_rate: dec!(0.01),
            ..input
        };
        assert_eq!(build_schedule(&amortizing).unwrap().len(), 120);
    }

    #[test]
    fn test_runaway_balance_ends_without_panic() {
        let schedule = generate_amortization_schedule(
            dec!(1_000_000),
            dec!(1),
            dec!(1),
            1_000,
        );
        let rows = schedule.rows();
        assert!(!rows.is_empty());
        assert!(rows.len() < 1_000);
        // Each month the unpaid interest doubles the balance
        assert_eq!(rows[0].remaining_balance, dec!(1_999_999));
        let totals = schedule.totals();
        assert_eq!(totals.periods, 1_000);
        assert!(totals.final_balance > dec!(1_000_000));
    }
}
