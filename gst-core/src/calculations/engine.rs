//! GST computation for a single amount.
//!
//! | Basis     | Net                  | Tax                              | Total          |
//! |-----------|----------------------|----------------------------------|----------------|
//! | Exclusive | amount               | amount × rate / 100              | net + tax      |
//! | Inclusive | total − tax          | amount − amount / (1 + rate/100) | amount         |
//!
//! Intra-state supplies split the tax evenly into CGST and SGST; inter-state
//! supplies carry it as a single IGST component.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use gst_core::{CalculationInput, Jurisdiction, PriceBasis, TaxEngine};
//!
//! let input = CalculationInput::new(
//!     dec!(1180),
//!     dec!(18),
//!     PriceBasis::Inclusive,
//!     Jurisdiction::InterState,
//! );
//!
//! let result = TaxEngine::new().compute(&input);
//!
//! assert_eq!(result.net_amount, dec!(1000));
//! assert_eq!(result.tax_amount, dec!(180));
//! assert_eq!(result.igst(), Some(dec!(180)));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{clamp_amount, clamp_rate};
use crate::models::{CalculationInput, CalculationResult, Jurisdiction, PriceBasis, TaxSplit};

/// Stateless GST calculator.
///
/// `compute` is total: it never fails and never panics. Negative amounts and
/// rates are treated as zero, rates above 100 are capped, and amounts are held
/// under [`MAX_WORKING_AMOUNT`](crate::calculations::common::MAX_WORKING_AMOUNT),
/// which any exclusive total stays below.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxEngine;

impl TaxEngine {
    pub fn new() -> Self {
        Self
    }

    /// Computes net, tax, split and total for `input`.
    pub fn compute(
        &self,
        input: &CalculationInput,
    ) -> CalculationResult {
        let amount = clamp_amount(input.amount);
        let rate = clamp_rate(input.rate);

        let (net_amount, tax_amount, total_amount) = match input.price_basis {
            PriceBasis::Exclusive => self.exclusive_breakdown(amount, rate),
            PriceBasis::Inclusive => self.inclusive_breakdown(amount, rate),
        };

        let split = self.split_tax(tax_amount, input.jurisdiction);

        debug!(
            %amount,
            %rate,
            basis = input.price_basis.as_str(),
            jurisdiction = input.jurisdiction.as_str(),
            %tax_amount,
            %total_amount,
            "computed gst"
        );

        CalculationResult {
            net_amount,
            tax_amount,
            total_amount,
            split,
        }
    }

    /// Tax added on top of `amount`.
    fn exclusive_breakdown(
        &self,
        amount: Decimal,
        rate: Decimal,
    ) -> (Decimal, Decimal, Decimal) {
        let tax = amount * rate / Decimal::ONE_HUNDRED;
        (amount, tax, amount + tax)
    }

    /// Tax embedded in the tax-inclusive `amount`.
    fn inclusive_breakdown(
        &self,
        amount: Decimal,
        rate: Decimal,
    ) -> (Decimal, Decimal, Decimal) {
        if rate.is_zero() {
            return (amount, Decimal::ZERO, amount);
        }

        let divisor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
        let tax = amount - amount / divisor;
        (amount - tax, tax, amount)
    }

    fn split_tax(
        &self,
        tax: Decimal,
        jurisdiction: Jurisdiction,
    ) -> TaxSplit {
        match jurisdiction {
            Jurisdiction::IntraState => {
                let half = tax / Decimal::TWO;
                TaxSplit::Intra {
                    cgst: half,
                    sgst: half,
                }
            }
            Jurisdiction::InterState => TaxSplit::Inter { igst: tax },
        }
    }
}

/// Shorthand for `TaxEngine::new().compute(input)`.
pub fn compute(input: &CalculationInput) -> CalculationResult {
    TaxEngine::new().compute(input)
}
