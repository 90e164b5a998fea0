use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use bankdesk_core::config::{BankCatalog, LoanCategory};
use bankdesk_core::types::{Money, Percent};

use crate::input::{self, CliResult};

/// Built-in catalog, or the JSON/YAML file given with `--catalog`.
pub fn load_catalog(path: Option<&str>) -> CliResult<BankCatalog> {
    let Some(path) = path else {
        return Ok(BankCatalog::builtin());
    };

    let contents = input::file::read_text(path)?;
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let catalog = if is_yaml {
        let catalog: BankCatalog = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path, e))?;
        catalog.validate()?;
        catalog
    } else {
        BankCatalog::from_json_str(&contents)?
    };

    log::debug!("loaded {} banks from {}", catalog.banks.len(), path);
    Ok(catalog)
}

#[derive(Debug, Serialize)]
struct BankSummary<'a> {
    id: &'a str,
    name: &'a str,
    base_rate: Percent,
    processing_fee_percent: Percent,
    loan_range: String,
    term_years: String,
    categories: Vec<LoanCategory>,
    fd_slabs: usize,
    credit_cards: usize,
    reference_price: Money,
    website: &'a str,
}

pub fn run_banks(catalog: &BankCatalog) -> CliResult<Value> {
    let banks: Vec<BankSummary> = catalog
        .banks
        .iter()
        .map(|b| BankSummary {
            id: &b.id,
            name: &b.name,
            base_rate: b.loan.base_rate,
            processing_fee_percent: b.loan.processing_fee_percent,
            loan_range: format!("{} - {}", b.loan.min_amount, b.loan.max_amount),
            term_years: format!("{} - {}", b.loan.min_term_years, b.loan.max_term_years),
            categories: b.loan.categories.clone(),
            fd_slabs: b.fd_rates.len(),
            credit_cards: b.credit_cards.len(),
            reference_price: b.reference_price,
            website: &b.website,
        })
        .collect();
    Ok(serde_json::to_value(banks)?)
}
