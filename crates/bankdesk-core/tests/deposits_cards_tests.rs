#![cfg(all(feature = "deposits", feature = "cards"))]

use bankdesk_core::cards::credit_cards::{self, CardBrowseQuery, CardFilter};
use bankdesk_core::config::{BankCatalog, CardTier};
use bankdesk_core::deposits::fixed_deposit::{self, FixedDepositQuery};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fd(bank_id: &str, days: u32, senior: bool) -> FixedDepositQuery {
    FixedDepositQuery {
        bank_id: bank_id.into(),
        principal: dec!(250_000),
        tenure_days: days,
        senior_citizen: senior,
    }
}

// ===========================================================================
// Fixed deposits
// ===========================================================================

#[test]
fn test_every_bank_quotes_the_standard_bands() {
    let catalog = BankCatalog::builtin();
    for bank in &catalog.banks {
        for days in [7, 100, 200, 400, 900, 1500, 3000] {
            let out = fixed_deposit::quote_fixed_deposit_for_bank(&catalog, &fd(&bank.id, days, false))
                .unwrap()
                .result;
            assert!(out.maturity_amount > out.principal, "{} {days}d", bank.id);
        }
    }
}

#[test]
fn test_senior_rate_never_below_regular() {
    let catalog = BankCatalog::builtin();
    for bank in &catalog.banks {
        let regular = fixed_deposit::quote_fixed_deposit_for_bank(&catalog, &fd(&bank.id, 730, false))
            .unwrap()
            .result;
        let senior = fixed_deposit::quote_fixed_deposit_for_bank(&catalog, &fd(&bank.id, 730, true))
            .unwrap()
            .result;
        assert!(senior.rate_applied >= regular.rate_applied);
        assert!(senior.maturity_amount >= regular.maturity_amount);
    }
}

#[test]
fn test_longer_tenure_earns_more_interest() {
    let catalog = BankCatalog::builtin();
    let one_year = fixed_deposit::quote_fixed_deposit_for_bank(&catalog, &fd("AXISBANK", 365, false))
        .unwrap()
        .result;
    let three_years = fixed_deposit::quote_fixed_deposit_for_bank(&catalog, &fd("AXISBANK", 1095, false))
        .unwrap()
        .result;
    assert!(three_years.interest_earned > one_year.interest_earned);
    assert_eq!(three_years.full_quarters, 12);
    assert_eq!(three_years.residual_days, Decimal::ZERO);
}

#[test]
fn test_ten_year_cap() {
    let catalog = BankCatalog::builtin();
    let err = fixed_deposit::quote_fixed_deposit_for_bank(&catalog, &fd("SBIN.NS", 3650, false))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
}

// ===========================================================================
// Credit cards
// ===========================================================================

#[test]
fn test_card_shelf_for_each_bank() {
    let catalog = BankCatalog::builtin();
    let expected = [("SBIN.NS", 3), ("AXISBANK.NS", 2), ("HDFCBANK.NS", 3), ("KOTAKBANK.NS", 2), ("ICICIBANK.NS", 3)];
    for (bank_id, count) in expected {
        let query = CardBrowseQuery {
            bank_id: bank_id.into(),
            filter: CardFilter::default(),
        };
        let out = credit_cards::browse_credit_cards_for_bank(&catalog, &query)
            .unwrap()
            .result;
        assert_eq!(out.cards.len(), count, "{bank_id}");
        for pair in out.cards.windows(2) {
            assert!(pair[0].net_annual_fee <= pair[1].net_annual_fee);
        }
        for card in &out.cards {
            assert!(card.effective_annual_rate > card.annual_percentage_rate);
        }
    }
}

#[test]
fn test_business_cards_only() {
    let catalog = BankCatalog::builtin();
    let query = CardBrowseQuery {
        bank_id: "ICICIBANK.NS".into(),
        filter: CardFilter {
            tier: Some(CardTier::Business),
            ..CardFilter::default()
        },
    };
    let out = credit_cards::browse_credit_cards_for_bank(&catalog, &query)
        .unwrap()
        .result;
    assert_eq!(out.cards.len(), 1);
    assert_eq!(out.cards[0].tier, CardTier::Business);
    assert_eq!(out.total_available, 3);
}
