//! Share-price alerts: validate a subscription, then check it against a price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::BankDeskError;
use crate::market::data_source::QuoteSource;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankDeskResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertDirection {
    /// Fire once the price is at or above the target.
    Above,
    /// Fire once the price is at or below the target.
    Below,
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertDirection::Above => f.write_str("above"),
            AlertDirection::Below => f.write_str("below"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    pub bank_id: String,
    pub email: String,
    pub direction: AlertDirection,
    pub target_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvaluation {
    pub bank_id: String,
    pub direction: AlertDirection,
    pub target_price: Money,
    pub current_price: Money,
    pub triggered: bool,
    /// How far the price still has to move to reach the target; zero once triggered.
    pub distance: Money,
    pub distance_pct: Percent,
}

pub fn validate_alert(alert: &PriceAlert) -> BankDeskResult<()> {
    if alert.bank_id.trim().is_empty() {
        return Err(BankDeskError::InvalidInput {
            field: "bank_id".into(),
            reason: "Choose a bank to watch.".into(),
        });
    }
    validate_email(&alert.email)?;
    if alert.target_price <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "target_price".into(),
            reason: "Target price must be positive.".into(),
        });
    }
    Ok(())
}

fn validate_email(email: &str) -> BankDeskResult<()> {
    let invalid = |reason: &str| BankDeskError::InvalidInput {
        field: "email".into(),
        reason: reason.into(),
    };
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid("Email address must be non-empty and contain no spaces."));
    }
    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => (local, domain),
        _ => return Err(invalid("Email address must contain exactly one '@'.")),
    };
    if local.is_empty() {
        return Err(invalid("Email address is missing the part before '@'."));
    }
    let has_dotted_domain = domain
        .split_once('.')
        .is_some_and(|(host, rest)| !host.is_empty() && !rest.is_empty() && !rest.ends_with('.'));
    if !has_dotted_domain {
        return Err(invalid("Email domain must look like 'example.com'."));
    }
    Ok(())
}

/// Check one alert against `current_price`.
pub fn evaluate_alert(alert: &PriceAlert, current_price: Money) -> BankDeskResult<AlertEvaluation> {
    validate_alert(alert)?;
    if current_price <= Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "current_price".into(),
            reason: "Current price must be positive.".into(),
        });
    }

    let triggered = match alert.direction {
        AlertDirection::Above => current_price >= alert.target_price,
        AlertDirection::Below => current_price <= alert.target_price,
    };
    let distance = if triggered {
        Decimal::ZERO
    } else {
        (alert.target_price - current_price).abs()
    };
    let distance_pct = (distance / current_price * Decimal::ONE_HUNDRED).round_dp(2);

    if triggered {
        log::info!(
            "alert for {} triggered: {} {} {}",
            alert.bank_id,
            current_price,
            alert.direction,
            alert.target_price
        );
    }

    Ok(AlertEvaluation {
        bank_id: alert.bank_id.clone(),
        direction: alert.direction,
        target_price: alert.target_price,
        current_price,
        triggered,
        distance,
        distance_pct,
    })
}

/// Check every alert against one price lookup each. An alert whose bank the
/// source cannot price is reported as a warning and left out.
pub fn evaluate_with_source(
    alerts: &[PriceAlert],
    source: &dyn QuoteSource,
) -> BankDeskResult<ComputationOutput<Vec<AlertEvaluation>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut evaluations = Vec::with_capacity(alerts.len());

    for alert in alerts {
        validate_alert(alert)?;
        match source.latest_price(&alert.bank_id) {
            Ok(price) => evaluations.push(evaluate_alert(alert, price)?),
            Err(e) => {
                log::warn!("no quote for {}: {e}", alert.bank_id);
                warnings.push(format!("{}: {e}", alert.bank_id));
            }
        }
    }

    let triggered = evaluations.iter().filter(|e| e.triggered).count();
    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "alerts": alerts.len(),
        "triggered": triggered,
        "trigger_rule": "above: price >= target; below: price <= target",
    });

    Ok(with_metadata(
        "Price alert evaluation against latest quotes",
        &assumptions,
        warnings,
        elapsed,
        evaluations,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::data_source::StaticQuoteSource;
    use rust_decimal_macros::dec;

    fn alert(direction: AlertDirection, target: Decimal) -> PriceAlert {
        PriceAlert {
            bank_id: "SBIN.NS".into(),
            email: "investor@example.com".into(),
            direction,
            target_price: target,
        }
    }

    #[test]
    fn test_email_rules() {
        let mut a = alert(AlertDirection::Above, dec!(800));
        for bad in ["", "no-at.example.com", "@example.com", "a@b@c.com", "a@example", "a b@example.com", "a@.com", "a@example."] {
            a.email = bad.into();
            assert!(validate_alert(&a).is_err(), "{bad} should be rejected");
        }
        a.email = "first.last@bank.co.in".into();
        assert!(validate_alert(&a).is_ok());
    }

    #[test]
    fn test_target_must_be_positive() {
        let a = alert(AlertDirection::Below, Decimal::ZERO);
        assert_eq!(validate_alert(&a).unwrap_err().code(), "INVALID_INPUT");
    }

    #[test]
    fn test_above_alert() {
        let a = alert(AlertDirection::Above, dec!(800));
        let pending = evaluate_alert(&a, dec!(778.10)).unwrap();
        assert!(!pending.triggered);
        assert_eq!(pending.distance, dec!(21.90));
        assert_eq!(pending.distance_pct, dec!(2.81));

        let hit = evaluate_alert(&a, dec!(800)).unwrap();
        assert!(hit.triggered);
        assert_eq!(hit.distance, Decimal::ZERO);
    }

    #[test]
    fn test_below_alert() {
        let a = alert(AlertDirection::Below, dec!(750));
        assert!(!evaluate_alert(&a, dec!(778.10)).unwrap().triggered);
        assert!(evaluate_alert(&a, dec!(749.95)).unwrap().triggered);
    }

    #[test]
    fn test_evaluate_with_source() {
        let source = StaticQuoteSource::new().with_price("SBIN.NS", dec!(810));
        let mut unknown = alert(AlertDirection::Above, dec!(100));
        unknown.bank_id = "YESBANK.NS".into();
        let alerts = vec![alert(AlertDirection::Above, dec!(800)), unknown];
        let out = evaluate_with_source(&alerts, &source).unwrap();
        assert_eq!(out.result.len(), 1);
        assert!(out.result[0].triggered);
        assert_eq!(out.warnings.len(), 1);
    }
}
