use rust_decimal::Decimal;

use crate::error::BankDeskError;
use crate::types::{Money, Rate};
use crate::BankDeskResult;

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// `(1 + r)^n`, or `None` once the factor leaves `Decimal` range.
pub fn checked_compound(rate: Rate, n: u32) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(rate)?;
    (0..n).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(factor))
}

/// Level payment that amortizes `principal` over `nper` periods at `rate` per period.
///
/// This is the EMI formula `P * r * (1+r)^n / ((1+r)^n - 1)`. At a zero rate the
/// formula divides by zero and the payment degrades to straight-line `P / n`.
/// A negative rate has no meaningful annuity and is reported as degenerate so the
/// caller can decide how to recover.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> BankDeskResult<Money> {
    if nper == 0 {
        return Err(BankDeskError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    if rate < Decimal::ZERO {
        return Err(BankDeskError::ArithmeticDegenerate {
            context: format!("annuity payment at negative periodic rate {rate}"),
        });
    }

    let out_of_range = || BankDeskError::InvalidInput {
        field: "rate".into(),
        reason: format!("Annuity factor at {rate} per period over {nper} periods is out of range."),
    };
    let factor = checked_compound(rate, nper).ok_or_else(out_of_range)?;
    let denominator = factor - Decimal::ONE;

    if denominator.is_zero() {
        return Err(BankDeskError::ArithmeticDegenerate {
            context: "annuity factor (1+r)^n - 1 is zero".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_mul(factor))
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(out_of_range)
}

/// Future value of a lump sum compounded `nper` times at `rate` per period.
pub fn future_value(present_value: Money, rate: Rate, nper: u32) -> Money {
    present_value * compound(rate, nper)
}
