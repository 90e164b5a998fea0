use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values, in rupees. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates quoted the way Indian banks publish them: in percent (8.5 = 8.5%).
pub type Percent = Decimal;

/// Per-period rates as decimals (0.0075 = 0.75% per month).
pub type Rate = Decimal;

pub const MONTHS_PER_YEAR: u32 = 12;

/// `pct` percent of `amount`, e.g. a processing fee on a sanctioned principal.
pub fn percent_of(amount: Money, pct: Percent) -> Money {
    amount * pct / Decimal::ONE_HUNDRED
}

/// Convert an annual percentage rate into the monthly decimal rate (8.0 -> 0.00666..).
pub fn monthly_rate_from_annual_percent(annual: Percent) -> Rate {
    annual / Decimal::from(MONTHS_PER_YEAR * 100)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(500_000), dec!(0.5)), dec!(2500));
    }

    #[test]
    fn test_monthly_rate_from_annual_percent() {
        assert_eq!(monthly_rate_from_annual_percent(dec!(12)), dec!(0.01));
    }
}
