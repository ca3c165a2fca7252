use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Jurisdiction, PriceBasis};
use crate::calculations::common::{clamp_amount, clamp_rate};
use crate::input::coerce_f64;

/// Rate selected when the calculator starts.
pub const DEFAULT_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// One snapshot of what the user has entered.
///
/// Values are never mutated in place; every input event builds a new
/// snapshot through the `with_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub amount: Decimal,
    /// Percentage in `[0, 100]`.
    pub rate: Decimal,
    pub price_basis: PriceBasis,
    pub jurisdiction: Jurisdiction,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            amount: Decimal::ZERO,
            rate: DEFAULT_RATE,
            price_basis: PriceBasis::default(),
            jurisdiction: Jurisdiction::default(),
        }
    }
}

impl CalculationInput {
    /// Builds an input, coercing a negative amount to zero and clamping the rate.
    pub fn new(
        amount: Decimal,
        rate: Decimal,
        price_basis: PriceBasis,
        jurisdiction: Jurisdiction,
    ) -> Self {
        Self {
            amount: clamp_amount(amount),
            rate: clamp_rate(rate),
            price_basis,
            jurisdiction,
        }
    }

    /// Builds an input from floating point values. NaN, infinities and
    /// negatives become zero.
    pub fn from_f64(
        amount: f64,
        rate: f64,
        price_basis: PriceBasis,
        jurisdiction: Jurisdiction,
    ) -> Self {
        Self::new(coerce_f64(amount), coerce_f64(rate), price_basis, jurisdiction)
    }

    pub fn with_amount(self, amount: Decimal) -> Self {
        Self {
            amount: clamp_amount(amount),
            ..self
        }
    }

    pub fn with_rate(self, rate: Decimal) -> Self {
        Self {
            rate: clamp_rate(rate),
            ..self
        }
    }

    pub fn with_price_basis(self, price_basis: PriceBasis) -> Self {
        Self { price_basis, ..self }
    }

    pub fn with_jurisdiction(self, jurisdiction: Jurisdiction) -> Self {
        Self {
            jurisdiction,
            ..self
        }
    }

    /// Basis and jurisdiction as recorded in history, e.g. `"Excl. Intra"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.price_basis.label(), self.jurisdiction.label())
    }
}
