//! Per-call pricing for the place-search API.
//!
//! Every call is charged when it is attempted, whether or not it succeeds.

use rust_decimal::Decimal;
use serde::Serialize;

/// Fixed price of each external call type, in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitCosts {
    #[serde(with = "rust_decimal::serde::float")]
    pub text_search: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub details_basic: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub details_contact: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub details_atmosphere: Decimal,
}

impl UnitCosts {
    /// Cost of one details call: the sum of its three fee components.
    #[must_use]
    pub fn details(&self) -> Decimal {
        self.details_basic + self.details_contact + self.details_atmosphere
    }

    /// Most a single record can cost: one search plus one details call.
    #[must_use]
    pub fn max_per_record(&self) -> Decimal {
        self.text_search + self.details()
    }
}

impl Default for UnitCosts {
    /// Text Search (New) and Place Details pricing as of November 2024.
    fn default() -> Self {
        Self {
            text_search: Decimal::new(32, 3),
            details_basic: Decimal::ZERO,
            details_contact: Decimal::new(3, 3),
            details_atmosphere: Decimal::new(5, 3),
        }
    }
}
