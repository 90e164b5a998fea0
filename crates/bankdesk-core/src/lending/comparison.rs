//! Side-by-side loan offers across every lender in the catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{BankCatalog, LoanCategory};
use crate::error::BankDeskError;
use crate::lending::loan_quote::{compute_loan_quote, LoanRequest};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankDeskResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonInput {
    pub category: LoanCategory,
    pub principal: Money,
    pub term_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedOffer {
    pub rank: u32,
    pub bank_id: String,
    pub bank_name: String,
    pub effective_annual_rate: Percent,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub processing_fee: Money,
    /// Everything the borrower pays over the life of the loan, fee included.
    pub total_cost: Money,
}

/// A lender that could not quote, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedLender {
    pub bank_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonOutput {
    pub category: LoanCategory,
    pub principal: Money,
    pub term_years: u32,
    pub best_bank_id: String,
    /// Monthly saving of the cheapest offer against the dearest one.
    pub emi_spread: Money,
    pub offers: Vec<RankedOffer>,
    pub skipped: Vec<SkippedLender>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Quote the same request at every bank and rank by EMI, then processing fee.
pub fn compare_loan_offers(
    catalog: &BankCatalog,
    input: &LoanComparisonInput,
) -> BankDeskResult<ComputationOutput<LoanComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut offers: Vec<RankedOffer> = Vec::new();
    let mut skipped: Vec<SkippedLender> = Vec::new();

    for bank in &catalog.banks {
        let request = LoanRequest {
            principal: input.principal,
            annual_rate_percent: bank.loan.base_rate,
            term_years: input.term_years,
            category: input.category,
        };
        match compute_loan_quote(&request, &bank.loan, &catalog.policy) {
            Ok(out) => {
                let q = out.result;
                warnings.extend(out.warnings.into_iter().map(|w| format!("{}: {w}", bank.id)));
                offers.push(RankedOffer {
                    rank: 0,
                    bank_id: bank.id.clone(),
                    bank_name: bank.name.clone(),
                    effective_annual_rate: q.effective_annual_rate,
                    monthly_payment: q.monthly_payment,
                    total_interest: q.total_interest,
                    processing_fee: q.processing_fee,
                    total_cost: q.total_payment + q.processing_fee,
                });
            }
            Err(e) => {
                log::debug!("{} skipped for {} comparison: {e}", bank.id, input.category);
                skipped.push(SkippedLender {
                    bank_id: bank.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if offers.is_empty() {
        return Err(BankDeskError::InsufficientData(format!(
            "No lender in the catalog can quote a {} loan of {} over {} years.",
            input.category, input.principal, input.term_years
        )));
    }

    offers.sort_by(|a, b| {
        a.monthly_payment
            .cmp(&b.monthly_payment)
            .then(a.processing_fee.cmp(&b.processing_fee))
    });
    for (i, offer) in offers.iter_mut().enumerate() {
        offer.rank = i as u32 + 1;
    }

    let best_bank_id = offers[0].bank_id.clone();
    let emi_spread = offers
        .last()
        .map(|worst| worst.monthly_payment - offers[0].monthly_payment)
        .unwrap_or(Decimal::ZERO);

    let output = LoanComparisonOutput {
        category: input.category,
        principal: input.principal,
        term_years: input.term_years,
        best_bank_id,
        emi_spread,
        offers,
        skipped,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ranking": "monthly_payment asc, then processing_fee asc",
        "lenders_considered": catalog.banks.len(),
    });

    Ok(with_metadata(
        "Lender comparison on EMI and processing fee",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
