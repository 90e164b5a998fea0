use std::sync::OnceLock;

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use bankdesk_core::config::BankCatalog;
use bankdesk_core::BankDeskError;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Core errors keep their reason code so JS callers can branch on it.
fn core_error(e: BankDeskError) -> napi::Error {
    napi::Error::from_reason(format!("{}: {}", e.code(), e))
}

fn catalog() -> &'static BankCatalog {
    static CATALOG: OnceLock<BankCatalog> = OnceLock::new();
    CATALOG.get_or_init(BankCatalog::builtin)
}

// ---------------------------------------------------------------------------
// Lending
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_quote(input_json: String) -> NapiResult<String> {
    let input: bankdesk_core::lending::loan_quote::BankLoanQuery =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        bankdesk_core::lending::loan_quote::quote_for_bank(catalog(), &input).map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct AmortizationRequest {
    #[serde(flatten)]
    schedule: bankdesk_core::lending::amortization::AmortizationInput,
    #[serde(default)]
    yearly: bool,
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = bankdesk_core::lending::amortization::build_schedule(&input.schedule)
        .map_err(core_error)?;
    if input.yearly {
        serde_json::to_string(&schedule.yearly_summary()).map_err(to_napi_error)
    } else {
        serde_json::to_string(&schedule.rows()).map_err(to_napi_error)
    }
}

#[napi]
pub fn compare_loans(input_json: String) -> NapiResult<String> {
    let input: bankdesk_core::lending::comparison::LoanComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bankdesk_core::lending::comparison::compare_loan_offers(catalog(), &input)
        .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Deposits and cards
// ---------------------------------------------------------------------------

#[napi]
pub fn fixed_deposit_quote(input_json: String) -> NapiResult<String> {
    let input: bankdesk_core::deposits::fixed_deposit::FixedDepositQuery =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        bankdesk_core::deposits::fixed_deposit::quote_fixed_deposit_for_bank(catalog(), &input)
            .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn browse_credit_cards(input_json: String) -> NapiResult<String> {
    let input: bankdesk_core::cards::credit_cards::CardBrowseQuery =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bankdesk_core::cards::credit_cards::browse_credit_cards_for_bank(catalog(), &input)
        .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_price_alert(input_json: String) -> NapiResult<bool> {
    let alert: bankdesk_core::alerts::price_alert::PriceAlert =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    bankdesk_core::alerts::price_alert::validate_alert(&alert).map_err(core_error)?;
    Ok(true)
}

/// Evaluate an array of alerts against the catalog reference prices.
#[napi]
pub fn evaluate_price_alerts(input_json: String) -> NapiResult<String> {
    let alerts: Vec<bankdesk_core::alerts::price_alert::PriceAlert> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let source = bankdesk_core::market::data_source::StaticQuoteSource::from_catalog(catalog());
    let output = bankdesk_core::alerts::price_alert::evaluate_with_source(&alerts, &source)
        .map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_sentiment(input_json: String) -> NapiResult<String> {
    let input: bankdesk_core::market::sentiment::SentimentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        bankdesk_core::market::sentiment::analyze_sentiment(&input.changes).map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn parametric_var(input_json: String) -> NapiResult<String> {
    let input: bankdesk_core::market::risk::ParametricVarInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bankdesk_core::market::risk::parametric_var(&input).map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn technical_indicators(input_json: String) -> NapiResult<String> {
    let input: bankdesk_core::market::indicators::IndicatorInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        bankdesk_core::market::indicators::compute_indicators(&input).map_err(core_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Session status right now, in exchange local time.
#[napi]
pub fn market_status() -> NapiResult<String> {
    let cat = catalog();
    let report = bankdesk_core::market::session::session_report_utc(
        chrono::Utc::now(),
        &cat.session,
        &cat.holidays,
    )
    .map_err(core_error)?;
    serde_json::to_string(&report).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn list_banks() -> NapiResult<String> {
    serde_json::to_string(catalog()).map_err(to_napi_error)
}
