//! Credit card browser.
//!
//! Filters a bank's card shelf and puts the cost of each card on a common
//! footing: annualised finance charge and the fee actually payable once a
//! spend-based waiver is taken into account.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{BankCatalog, BankProfile, CardTier};
use crate::error::BankDeskError;
use crate::time_value::compound;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, MONTHS_PER_YEAR};
use crate::BankDeskResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardFilter {
    #[serde(default)]
    pub tier: Option<CardTier>,
    #[serde(default)]
    pub max_annual_fee: Option<Money>,
    /// Expected yearly card spend, used to decide whether a fee waiver applies.
    #[serde(default)]
    pub expected_annual_spend: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardBrowseQuery {
    pub bank_id: String,
    #[serde(default)]
    pub filter: CardFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardListing {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tier: CardTier,
    pub monthly_interest_rate: Percent,
    /// Monthly rate x 12, as issuers quote it.
    pub annual_percentage_rate: Percent,
    /// Monthly rate compounded over a year.
    pub effective_annual_rate: Percent,
    pub annual_fee: Money,
    pub fee_waived: bool,
    pub net_annual_fee: Money,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardBrowseOutput {
    pub bank_id: String,
    pub bank_name: String,
    pub website: String,
    pub total_available: usize,
    pub cards: Vec<CardListing>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// List a bank's cards matching `filter`, cheapest net fee first.
pub fn browse_credit_cards(
    bank: &BankProfile,
    filter: &CardFilter,
) -> BankDeskResult<ComputationOutput<CardBrowseOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_filter(filter)?;

    let mut cards: Vec<CardListing> = bank
        .credit_cards
        .iter()
        .filter(|c| filter.tier.map_or(true, |t| c.tier == t))
        .filter(|c| filter.max_annual_fee.map_or(true, |max| c.annual_fee <= max))
        .map(|c| {
            let fee_waived = match (c.fee_waiver_spend, filter.expected_annual_spend) {
                (Some(threshold), Some(spend)) => spend >= threshold,
                _ => false,
            };
            let monthly = c.monthly_interest_rate / Decimal::ONE_HUNDRED;
            CardListing {
                id: c.id.clone(),
                name: c.name.clone(),
                description: c.description.clone(),
                tier: c.tier,
                monthly_interest_rate: c.monthly_interest_rate,
                annual_percentage_rate: c.monthly_interest_rate * Decimal::from(MONTHS_PER_YEAR),
                effective_annual_rate: ((compound(monthly, MONTHS_PER_YEAR) - Decimal::ONE)
                    * Decimal::ONE_HUNDRED)
                    .round_dp(2),
                annual_fee: c.annual_fee,
                fee_waived,
                net_annual_fee: if fee_waived { Decimal::ZERO } else { c.annual_fee },
                benefits: c.benefits.clone(),
            }
        })
        .collect();

    cards.sort_by(|a, b| {
        a.net_annual_fee
            .cmp(&b.net_annual_fee)
            .then(a.annual_percentage_rate.cmp(&b.annual_percentage_rate))
    });

    if cards.is_empty() {
        warnings.push(format!("No {} card matches the filter.", bank.name));
    }
    if cards.iter().any(|c| c.effective_annual_rate > dec!(40)) {
        warnings.push("Revolving balances on these cards cost over 40% a year.".into());
    }

    let output = CardBrowseOutput {
        bank_id: bank.id.clone(),
        bank_name: bank.name.clone(),
        website: bank.website.clone(),
        total_available: bank.credit_cards.len(),
        cards,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "sort": "net_annual_fee asc, then annual_percentage_rate asc",
        "fee_waiver": "applies when expected_annual_spend >= fee_waiver_spend",
    });

    Ok(with_metadata(
        "Credit card shelf comparison",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

pub fn browse_credit_cards_for_bank(
    catalog: &BankCatalog,
    query: &CardBrowseQuery,
) -> BankDeskResult<ComputationOutput<CardBrowseOutput>> {
    let bank = catalog.get(&query.bank_id)?;
    browse_credit_cards(bank, &query.filter)
}

fn validate_filter(filter: &CardFilter) -> BankDeskResult<()> {
    if filter.max_annual_fee.is_some_and(|f| f < Decimal::ZERO) {
        return Err(BankDeskError::InvalidInput {
            field: "max_annual_fee".into(),
            reason: "Fee ceiling cannot be negative.".into(),
        });
    }
    if filter.expected_annual_spend.is_some_and(|s| s < Decimal::ZERO) {
        return Err(BankDeskError::InvalidInput {
            field: "expected_annual_spend".into(),
            reason: "Annual spend cannot be negative.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
