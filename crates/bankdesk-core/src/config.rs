//! Bank catalog configuration.
//!
//! Per-bank loan terms, fixed-deposit slabs, credit-card offers, the loan
//! rate-adjustment policy and the exchange session are explicit records that
//! callers pass into the calculators. `BankCatalog::builtin()` carries the
//! published figures for five large Indian lenders; any other catalog can be
//! deserialised from JSON and checked with [`BankCatalog::validate`].

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::BankDeskError;
use crate::types::{Money, Percent};
use crate::BankDeskResult;

// ---------------------------------------------------------------------------
// Loan products
// ---------------------------------------------------------------------------

/// Retail loan product family. Each family carries its own rate adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanCategory {
    Home,
    Personal,
    Business,
    Education,
    Car,
    Gold,
}

impl LoanCategory {
    pub const ALL: [LoanCategory; 6] = [
        LoanCategory::Home,
        LoanCategory::Personal,
        LoanCategory::Business,
        LoanCategory::Education,
        LoanCategory::Car,
        LoanCategory::Gold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanCategory::Home => "home",
            LoanCategory::Personal => "personal",
            LoanCategory::Business => "business",
            LoanCategory::Education => "education",
            LoanCategory::Car => "car",
            LoanCategory::Gold => "gold",
        }
    }
}

impl fmt::Display for LoanCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanCategory {
    type Err = BankDeskError;

    /// Accepts "home", "Home Loan", "home-loan" and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        let key = normalized
            .strip_suffix(" loan")
            .unwrap_or(normalized.as_str())
            .trim();
        LoanCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| BankDeskError::InvalidInput {
                field: "category".into(),
                reason: format!(
                    "Unknown loan category '{s}'. Valid: home, personal, business, education, car, gold"
                ),
            })
    }
}

/// Longest loan tenure any catalog may offer.
pub const MAX_LOAN_TERM_YEARS: u32 = 50;

/// Longest fixed-deposit tenure any slab may cover (100 years).
pub const MAX_FD_TENURE_DAYS: u32 = 36_500;

fn default_max_rate() -> Percent {
    dec!(36)
}

/// A lender's published bounds and pricing for retail loans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanProductTerms {
    pub min_amount: Money,
    pub max_amount: Money,
    pub min_term_years: u32,
    pub max_term_years: u32,
    /// Base annual rate in percent before category and tenure adjustments.
    pub base_rate: Percent,
    /// Upper bound on any annual rate accepted for quoting.
    #[serde(default = "default_max_rate")]
    pub max_rate: Percent,
    pub processing_fee_percent: Percent,
    pub categories: Vec<LoanCategory>,
}

impl LoanProductTerms {
    pub fn offers(&self, category: LoanCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// Additive adjustments applied to a lender's base rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateAdjustmentPolicy {
    /// Percentage points added per category (negative for concessional products).
    pub category_adjustments: BTreeMap<LoanCategory, Percent>,
    /// Tenures strictly longer than this many years attract the premium below.
    pub long_term_threshold_years: u32,
    pub long_term_premium: Percent,
}

impl Default for RateAdjustmentPolicy {
    fn default() -> Self {
        let category_adjustments = BTreeMap::from([
            (LoanCategory::Home, dec!(-0.5)),
            (LoanCategory::Personal, dec!(1.5)),
            (LoanCategory::Business, dec!(0.75)),
            (LoanCategory::Education, dec!(-0.25)),
            (LoanCategory::Car, dec!(0.5)),
            (LoanCategory::Gold, dec!(0.25)),
        ]);
        RateAdjustmentPolicy {
            category_adjustments,
            long_term_threshold_years: 15,
            long_term_premium: dec!(0.25),
        }
    }
}

impl RateAdjustmentPolicy {
    pub fn category_adjustment(&self, category: LoanCategory) -> Percent {
        self.category_adjustments
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn term_adjustment(&self, term_years: u32) -> Percent {
        if term_years > self.long_term_threshold_years {
            self.long_term_premium
        } else {
            Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Deposits and cards
// ---------------------------------------------------------------------------

/// A fixed-deposit tenure band with regular and senior-citizen rates (percent p.a.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdRateSlab {
    pub min_days: u32,
    pub max_days: u32,
    pub regular_rate: Percent,
    pub senior_rate: Percent,
}

impl FdRateSlab {
    pub fn contains(&self, days: u32) -> bool {
        days >= self.min_days && days <= self.max_days
    }

    /// Human label in the style banks print on rate cards ("46-179 days", "1-2 years").
    pub fn label(&self) -> String {
        match self.max_days.checked_add(1) {
            Some(end) if self.min_days >= 365 && end % 365 == 0 => {
                format!("{}-{} years", self.min_days / 365, end / 365)
            }
            _ => format!("{}-{} days", self.min_days, self.max_days),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTier {
    Standard,
    Premium,
    Rewards,
    Business,
}

impl FromStr for CardTier {
    type Err = BankDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(CardTier::Standard),
            "premium" => Ok(CardTier::Premium),
            "rewards" => Ok(CardTier::Rewards),
            "business" => Ok(CardTier::Business),
            other => Err(BankDeskError::InvalidInput {
                field: "tier".into(),
                reason: format!("Unknown card tier '{other}'. Valid: standard, premium, rewards, business"),
            }),
        }
    }
}

/// A credit card product as advertised by the issuing bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardOffer {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tier: CardTier,
    /// Finance charge on revolving balances, percent per month.
    pub monthly_interest_rate: Percent,
    pub annual_fee: Money,
    /// Annual spend at which the fee is reversed, if the issuer offers a waiver.
    #[serde(default)]
    pub fee_waiver_spend: Option<Money>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

// ---------------------------------------------------------------------------
// Exchange session
// ---------------------------------------------------------------------------

/// Cash-market trading window, in exchange local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSession {
    pub open: NaiveTime,
    pub close: NaiveTime,
    /// Offset of exchange local time from UTC (IST is +330).
    pub utc_offset_minutes: i32,
}

impl Default for MarketSession {
    fn default() -> Self {
        MarketSession {
            open: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(15, 30, 0).unwrap_or_default(),
            utc_offset_minutes: 330,
        }
    }
}

/// NSE trading holidays for calendar year 2025.
pub fn nse_holidays_2025() -> Vec<NaiveDate> {
    [
        (1, 1),
        (1, 26),
        (3, 28),
        (4, 1),
        (4, 18),
        (5, 1),
        (6, 8),
        (8, 15),
        (9, 15),
        (10, 2),
        (10, 21),
        (11, 3),
        (12, 25),
    ]
    .iter()
    .filter_map(|&(m, d)| NaiveDate::from_ymd_opt(2025, m, d))
    .collect()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Everything the calculators need to know about one bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankProfile {
    /// Exchange ticker, e.g. "SBIN.NS".
    pub id: String,
    pub name: String,
    pub website: String,
    /// Last reference share price used when no live quote source is wired in.
    pub reference_price: Money,
    pub loan: LoanProductTerms,
    #[serde(default)]
    pub fd_rates: Vec<FdRateSlab>,
    #[serde(default)]
    pub credit_cards: Vec<CreditCardOffer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankCatalog {
    pub banks: Vec<BankProfile>,
    #[serde(default)]
    pub policy: RateAdjustmentPolicy,
    #[serde(default)]
    pub session: MarketSession,
    #[serde(default = "nse_holidays_2025")]
    pub holidays: Vec<NaiveDate>,
}

impl BankCatalog {
    /// Look up a bank by ticker. "SBIN.NS", "sbin.ns" and "SBIN" all resolve.
    pub fn get(&self, id: &str) -> BankDeskResult<&BankProfile> {
        let wanted = id.trim().to_uppercase();
        self.banks
            .iter()
            .find(|b| {
                let bank_id = b.id.to_uppercase();
                bank_id == wanted || bank_id.strip_suffix(".NS") == Some(wanted.as_str())
            })
            .ok_or_else(|| BankDeskError::UnknownBank(id.to_string()))
    }

    pub fn from_json_str(json: &str) -> BankDeskResult<Self> {
        let catalog: BankCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject catalogs whose records would make the calculators misbehave.
    pub fn validate(&self) -> BankDeskResult<()> {
        if self.banks.is_empty() {
            return Err(BankDeskError::InsufficientData(
                "Catalog must contain at least one bank.".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for bank in &self.banks {
            if !seen.insert(bank.id.to_uppercase()) {
                return Err(BankDeskError::InvalidInput {
                    field: "banks.id".into(),
                    reason: format!("Duplicate bank id '{}'.", bank.id),
                });
            }
            validate_loan_terms(&bank.id, &bank.loan)?;
            for slab in &bank.fd_rates {
                if slab.max_days > MAX_FD_TENURE_DAYS {
                    return Err(BankDeskError::InvalidInput {
                        field: "fd_rates".into(),
                        reason: format!(
                            "Bank '{}' has an FD slab ending at {} days; the limit is {}.",
                            bank.id, slab.max_days, MAX_FD_TENURE_DAYS
                        ),
                    });
                }
                if slab.min_days > slab.max_days {
                    return Err(BankDeskError::InvalidInput {
                        field: "fd_rates".into(),
                        reason: format!(
                            "Bank '{}' has an FD slab with min_days {} > max_days {}.",
                            bank.id, slab.min_days, slab.max_days
                        ),
                    });
                }
            }
            for card in &bank.credit_cards {
                if card.annual_fee < Decimal::ZERO || card.monthly_interest_rate < Decimal::ZERO {
                    return Err(BankDeskError::InvalidInput {
                        field: "credit_cards".into(),
                        reason: format!("Card '{}' has a negative fee or rate.", card.id),
                    });
                }
            }
        }

        if self.session.open >= self.session.close {
            return Err(BankDeskError::InvalidInput {
                field: "session".into(),
                reason: "Session open must be before close.".into(),
            });
        }

        Ok(())
    }

    /// Published terms for SBI, Axis, HDFC, Kotak and ICICI.
    pub fn builtin() -> Self {
        use LoanCategory::*;

        let sbi = BankProfile {
            id: "SBIN.NS".into(),
            name: "State Bank of India".into(),
            website: "https://www.onlinesbi.com".into(),
            reference_price: dec!(778.10),
            loan: LoanProductTerms {
                min_amount: dec!(100_000),
                max_amount: dec!(5_000_000),
                min_term_years: 1,
                max_term_years: 30,
                base_rate: dec!(8.5),
                max_rate: default_max_rate(),
                processing_fee_percent: dec!(0.5),
                categories: vec![Home, Personal, Education, Car, Business],
            },
            fd_rates: fd_slabs(&[
                (dec!(3.00), dec!(3.50)),
                (dec!(4.50), dec!(5.00)),
                (dec!(5.25), dec!(5.75)),
                (dec!(5.50), dec!(6.00)),
                (dec!(5.75), dec!(6.25)),
                (dec!(6.00), dec!(6.50)),
                (dec!(6.25), dec!(6.75)),
            ]),
            credit_cards: vec![
                card(
                    "sbi-1",
                    "SBI SimplySAVE Card",
                    "Everyday spending card with cashback on utility bills",
                    CardTier::Standard,
                    dec!(3.5),
                    dec!(499),
                    Some(dec!(100_000)),
                    &["5% cashback on utilities", "1% on all other spends", "Fuel surcharge waiver"],
                ),
                card(
                    "sbi-2",
                    "SBI PRIME Card",
                    "Premium card with higher credit limits and exclusive rewards",
                    CardTier::Premium,
                    dec!(3.35),
                    dec!(2999),
                    Some(dec!(300_000)),
                    &["Airport lounge access", "Milestone rewards", "2x reward points on travel"],
                ),
                card(
                    "sbi-3",
                    "SBI Business Advantage",
                    "Business expenses card with GST benefits",
                    CardTier::Business,
                    dec!(3.1),
                    dec!(1999),
                    None,
                    &["GST input benefits", "Travel insurance", "Expense categorization"],
                ),
            ],
        };

        let axis = BankProfile {
            id: "AXISBANK.NS".into(),
            name: "Axis Bank".into(),
            website: "https://www.axisbank.com".into(),
            reference_price: dec!(1013.00),
            loan: LoanProductTerms {
                min_amount: dec!(200_000),
                max_amount: dec!(7_000_000),
                min_term_years: 1,
                max_term_years: 25,
                base_rate: dec!(8.75),
                max_rate: default_max_rate(),
                processing_fee_percent: dec!(0.65),
                categories: vec![Home, Personal, Car, Gold],
            },
            fd_rates: fd_slabs(&[
                (dec!(3.25), dec!(3.75)),
                (dec!(4.75), dec!(5.25)),
                (dec!(5.45), dec!(5.95)),
                (dec!(5.75), dec!(6.25)),
                (dec!(6.00), dec!(6.50)),
                (dec!(6.10), dec!(6.60)),
                (dec!(6.35), dec!(6.85)),
            ]),
            credit_cards: vec![
                card(
                    "axis-1",
                    "Axis Neo Card",
                    "Digital-first lifestyle card with online shopping benefits",
                    CardTier::Standard,
                    dec!(3.4),
                    dec!(250),
                    Some(dec!(50_000)),
                    &["2% cashback on online shopping", "Movie ticket discounts", "Welcome vouchers"],
                ),
                card(
                    "axis-2",
                    "Axis Privilege Card",
                    "Lifestyle card with premium dining and travel benefits",
                    CardTier::Premium,
                    dec!(3.25),
                    dec!(3500),
                    Some(dec!(350_000)),
                    &["Complimentary lounge access", "4 reward points per ₹200", "Golf privileges"],
                ),
            ],
        };

        let hdfc = BankProfile {
            id: "HDFCBANK.NS".into(),
            name: "HDFC Bank".into(),
            website: "https://www.hdfcbank.com".into(),
            reference_price: dec!(1714.00),
            loan: LoanProductTerms {
                min_amount: dec!(300_000),
                max_amount: dec!(10_000_000),
                min_term_years: 1,
                max_term_years: 30,
                base_rate: dec!(8.35),
                max_rate: default_max_rate(),
                processing_fee_percent: dec!(0.6),
                categories: vec![Home, Personal, Business, Education, Car],
            },
            fd_rates: fd_slabs(&[
                (dec!(3.50), dec!(4.00)),
                (dec!(4.85), dec!(5.35)),
                (dec!(5.50), dec!(6.00)),
                (dec!(5.85), dec!(6.35)),
                (dec!(6.10), dec!(6.60)),
                (dec!(6.25), dec!(6.75)),
                (dec!(6.50), dec!(7.00)),
            ]),
            credit_cards: vec![
                card(
                    "hdfc-1",
                    "HDFC Moneyback Card",
                    "Everyday cashback card for all purchases",
                    CardTier::Standard,
                    dec!(3.5),
                    dec!(500),
                    Some(dec!(150_000)),
                    &["1.5% cashback on all spends", "Fuel surcharge waiver", "10x rewards at partner merchants"],
                ),
                card(
                    "hdfc-2",
                    "HDFC Regalia Gold",
                    "Premium travel and lifestyle card with superior rewards",
                    CardTier::Premium,
                    dec!(3.3),
                    dec!(2500),
                    Some(dec!(300_000)),
                    &["Unlimited airport lounge access", "Higher reward points", "Premium concierge services"],
                ),
                card(
                    "hdfc-3",
                    "HDFC Business Regalia",
                    "Premium business card with travel and expense management benefits",
                    CardTier::Business,
                    dec!(3.2),
                    dec!(2500),
                    None,
                    &["Complimentary airport transfers", "Expense management tools", "Insurance coverage"],
                ),
            ],
        };

        let kotak = BankProfile {
            id: "KOTAKBANK.NS".into(),
            name: "Kotak Mahindra Bank".into(),
            website: "https://www.kotak.com".into(),
            reference_price: dec!(1910.00),
            loan: LoanProductTerms {
                min_amount: dec!(200_000),
                max_amount: dec!(8_000_000),
                min_term_years: 1,
                max_term_years: 25,
                base_rate: dec!(8.7),
                max_rate: default_max_rate(),
                processing_fee_percent: dec!(0.55),
                categories: vec![Home, Personal, Business, Car],
            },
            fd_rates: fd_slabs(&[
                (dec!(3.25), dec!(3.75)),
                (dec!(4.65), dec!(5.15)),
                (dec!(5.40), dec!(5.90)),
                (dec!(5.70), dec!(6.20)),
                (dec!(5.90), dec!(6.40)),
                (dec!(6.10), dec!(6.60)),
                (dec!(6.20), dec!(6.70)),
            ]),
            credit_cards: vec![
                card(
                    "kotak-1",
                    "Kotak Essentia Platinum",
                    "Essential rewards card for everyday spending",
                    CardTier::Standard,
                    dec!(3.5),
                    dec!(700),
                    Some(dec!(100_000)),
                    &["2 reward points per ₹100", "Dining discounts", "1% fuel surcharge waiver"],
                ),
                card(
                    "kotak-2",
                    "Kotak Royale Signature",
                    "Premium lifestyle card with enhanced rewards",
                    CardTier::Premium,
                    dec!(3.4),
                    dec!(2499),
                    Some(dec!(250_000)),
                    &["Airport lounge access", "5X rewards on weekend dining", "Movie ticket offers"],
                ),
            ],
        };

        let icici = BankProfile {
            id: "ICICIBANK.NS".into(),
            name: "ICICI Bank".into(),
            website: "https://www.icicibank.com".into(),
            reference_price: dec!(1267.00),
            loan: LoanProductTerms {
                min_amount: dec!(250_000),
                max_amount: dec!(9_000_000),
                min_term_years: 1,
                max_term_years: 30,
                base_rate: dec!(8.6),
                max_rate: default_max_rate(),
                processing_fee_percent: dec!(0.6),
                categories: vec![Home, Personal, Car, Education, Gold],
            },
            fd_rates: fd_slabs(&[
                (dec!(3.25), dec!(3.75)),
                (dec!(4.65), dec!(5.15)),
                (dec!(5.35), dec!(5.85)),
                (dec!(5.65), dec!(6.15)),
                (dec!(5.85), dec!(6.35)),
                (dec!(6.10), dec!(6.60)),
                (dec!(6.30), dec!(6.80)),
            ]),
            credit_cards: vec![
                card(
                    "icici-1",
                    "ICICI Platinum Chip",
                    "Everyday card with essential benefits and rewards",
                    CardTier::Standard,
                    dec!(3.5),
                    dec!(500),
                    Some(dec!(125_000)),
                    &["2 reward points per ₹100", "Fuel surcharge waiver", "EMI conversion facility"],
                ),
                card(
                    "icici-2",
                    "ICICI Sapphiro",
                    "Premium lifestyle card with travel and dining benefits",
                    CardTier::Premium,
                    dec!(3.3),
                    dec!(3500),
                    Some(dec!(400_000)),
                    &["Airport lounge access", "Golf program", "Higher reward points on travel"],
                ),
                card(
                    "icici-3",
                    "ICICI Business Advantage",
                    "Business card with specialized expense management features",
                    CardTier::Business,
                    dec!(3.2),
                    dec!(1500),
                    None,
                    &["GST benefits", "Expense categorization", "Higher credit limits"],
                ),
            ],
        };

        BankCatalog {
            banks: vec![sbi, axis, hdfc, kotak, icici],
            policy: RateAdjustmentPolicy::default(),
            session: MarketSession::default(),
            holidays: nse_holidays_2025(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Standard retail FD tenure bands shared by all five lenders.
const FD_BANDS: [(u32, u32); 7] = [
    (7, 45),
    (46, 179),
    (180, 364),
    (365, 729),
    (730, 1094),
    (1095, 1824),
    (1825, 3649),
];

fn fd_slabs(rates: &[(Percent, Percent); 7]) -> Vec<FdRateSlab> {
    FD_BANDS
        .iter()
        .zip(rates.iter())
        .map(|(&(min_days, max_days), &(regular_rate, senior_rate))| FdRateSlab {
            min_days,
            max_days,
            regular_rate,
            senior_rate,
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn card(
    id: &str,
    name: &str,
    description: &str,
    tier: CardTier,
    monthly_interest_rate: Percent,
    annual_fee: Money,
    fee_waiver_spend: Option<Money>,
    benefits: &[&str],
) -> CreditCardOffer {
    CreditCardOffer {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        tier,
        monthly_interest_rate,
        annual_fee,
        fee_waiver_spend,
        benefits: benefits.iter().map(|b| b.to_string()).collect(),
    }
}

fn validate_loan_terms(bank_id: &str, terms: &LoanProductTerms) -> BankDeskResult<()> {
    if terms.min_amount <= Decimal::ZERO || terms.min_amount > terms.max_amount {
        return Err(BankDeskError::InvalidInput {
            field: "loan.min_amount".into(),
            reason: format!("Bank '{bank_id}' needs 0 < min_amount <= max_amount."),
        });
    }
    if terms.min_term_years == 0 || terms.min_term_years > terms.max_term_years {
        return Err(BankDeskError::InvalidInput {
            field: "loan.min_term_years".into(),
            reason: format!("Bank '{bank_id}' needs 0 < min_term_years <= max_term_years."),
        });
    }
    if terms.max_term_years > MAX_LOAN_TERM_YEARS {
        return Err(BankDeskError::InvalidInput {
            field: "loan.max_term_years".into(),
            reason: format!(
                "Bank '{bank_id}' offers {} years; the limit is {MAX_LOAN_TERM_YEARS}.",
                terms.max_term_years
            ),
        });
    }
    if terms.base_rate <= Decimal::ZERO || terms.base_rate > terms.max_rate {
        return Err(BankDeskError::InvalidInput {
            field: "loan.base_rate".into(),
            reason: format!("Bank '{bank_id}' needs 0 < base_rate <= max_rate."),
        });
    }
    if terms.processing_fee_percent < Decimal::ZERO {
        return Err(BankDeskError::InvalidInput {
            field: "loan.processing_fee_percent".into(),
            reason: format!("Bank '{bank_id}' has a negative processing fee."),
        });
    }
    if terms.categories.is_empty() {
        return Err(BankDeskError::InvalidInput {
            field: "loan.categories".into(),
            reason: format!("Bank '{bank_id}' offers no loan categories."),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = BankCatalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.banks.len(), 5);
        assert_eq!(catalog.holidays.len(), 13);
    }

    #[test]
    fn test_lookup_accepts_short_ticker() {
        let catalog = BankCatalog::builtin();
        assert_eq!(catalog.get("SBIN.NS").unwrap().name, "State Bank of India");
        assert_eq!(catalog.get("hdfcbank").unwrap().id, "HDFCBANK.NS");
        assert!(matches!(
            catalog.get("YESBANK"),
            Err(BankDeskError::UnknownBank(_))
        ));
    }

    #[test]
    fn test_loan_category_parsing() {
        assert_eq!("Home Loan".parse::<LoanCategory>().unwrap(), LoanCategory::Home);
        assert_eq!("gold".parse::<LoanCategory>().unwrap(), LoanCategory::Gold);
        assert_eq!(
            "education-loan".parse::<LoanCategory>().unwrap(),
            LoanCategory::Education
        );
        assert!("mortgage".parse::<LoanCategory>().is_err());
    }

    #[test]
    fn test_default_policy_adjustments() {
        let policy = RateAdjustmentPolicy::default();
        assert_eq!(policy.category_adjustment(LoanCategory::Home), dec!(-0.5));
        assert_eq!(policy.category_adjustment(LoanCategory::Personal), dec!(1.5));
        assert_eq!(policy.term_adjustment(15), Decimal::ZERO);
        assert_eq!(policy.term_adjustment(16), dec!(0.25));
    }

    #[test]
    fn test_fd_slab_labels() {
        let catalog = BankCatalog::builtin();
        let labels: Vec<String> = catalog.banks[0].fd_rates.iter().map(|s| s.label()).collect();
        assert_eq!(labels[0], "7-45 days");
        assert_eq!(labels[3], "1-2 years");
        assert_eq!(labels[6], "5-10 years");
    }

    #[test]
    fn test_catalog_json_roundtrip_validates() {
        let json = serde_json::to_string(&BankCatalog::builtin()).unwrap();
        let parsed = BankCatalog::from_json_str(&json).unwrap();
        assert_eq!(parsed.banks[4].id, "ICICIBANK.NS");
        assert_eq!(
            parsed.policy.category_adjustment(LoanCategory::Business),
            dec!(0.75)
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut catalog = BankCatalog::builtin();
        let dup = catalog.banks[0].clone();
        catalog.banks.push(dup);
        let err = catalog.validate().unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_oversized_tenures_rejected() {
        let mut catalog = BankCatalog::builtin();
        catalog.banks[2].fd_rates[6].max_days = u32::MAX;
        let err = catalog.validate().unwrap_err();
        match err {
            BankDeskError::InvalidInput { field, .. } => assert_eq!(field, "fd_rates"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let mut catalog = BankCatalog::builtin();
        catalog.banks[0].loan.max_term_years = 400_000_000;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_label_at_u32_limit() {
        let slab = FdRateSlab {
            min_days: 3650,
            max_days: u32::MAX,
            regular_rate: dec!(6),
            senior_rate: dec!(6.5),
        };
        assert_eq!(slab.label(), format!("3650-{} days", u32::MAX));
    }

    #[test]
    fn test_inverted_amount_bounds_rejected() {
        let mut catalog = BankCatalog::builtin();
        catalog.banks[1].loan.min_amount = dec!(10_000_000);
        assert!(catalog.validate().is_err());
    }
}
