//! Where share prices come from.
//!
//! Calculators that need a live price take a `&dyn QuoteSource`, so a feed
//! client can be plugged in without touching them. `StaticQuoteSource` serves
//! fixed prices, by default the catalog's reference prices.

use std::collections::BTreeMap;

use crate::config::BankCatalog;
use crate::error::BankDeskError;
use crate::types::Money;
use crate::BankDeskResult;

pub trait QuoteSource {
    /// Latest traded price for `bank_id`.
    fn latest_price(&self, bank_id: &str) -> BankDeskResult<Money>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticQuoteSource {
    prices: BTreeMap<String, Money>,
}

impl StaticQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: &BankCatalog) -> Self {
        catalog
            .banks
            .iter()
            .fold(Self::new(), |source, bank| {
                source.with_price(&bank.id, bank.reference_price)
            })
    }

    /// Set or replace the price served for `bank_id`.
    pub fn with_price(mut self, bank_id: &str, price: Money) -> Self {
        self.prices.insert(normalize(bank_id), price);
        self
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl QuoteSource for StaticQuoteSource {
    fn latest_price(&self, bank_id: &str) -> BankDeskResult<Money> {
        self.prices
            .get(&normalize(bank_id))
            .copied()
            .ok_or_else(|| BankDeskError::UnknownBank(bank_id.to_string()))
    }
}

// "sbin", "SBIN" and "SBIN.NS" share one key
fn normalize(bank_id: &str) -> String {
    let upper = bank_id.trim().to_uppercase();
    match upper.strip_suffix(".NS") {
        Some(base) => base.to_string(),
        None => upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_catalog_prices_served() {
        let source = StaticQuoteSource::from_catalog(&BankCatalog::builtin());
        assert_eq!(source.len(), 5);
        assert_eq!(source.latest_price("SBIN.NS").unwrap(), dec!(778.10));
        assert_eq!(source.latest_price("sbin").unwrap(), dec!(778.10));
    }

    #[test]
    fn test_override_and_unknown() {
        let source = StaticQuoteSource::new().with_price("HDFCBANK.NS", dec!(1700));
        assert_eq!(source.latest_price("HDFCBANK").unwrap(), dec!(1700));
        let err = source.latest_price("YESBANK.NS").unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_BANK");
    }
}
