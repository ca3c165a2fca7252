use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the tax amount is divided between authorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxSplit {
    /// Central and State GST, each half of the tax.
    Intra { cgst: Decimal, sgst: Decimal },
    /// Integrated GST, the whole tax.
    Inter { igst: Decimal },
}

/// Output of [`crate::TaxEngine::compute`]. Values are unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    /// Always `net_amount + tax_amount`.
    pub total_amount: Decimal,
    pub split: TaxSplit,
}

impl CalculationResult {
    pub fn cgst(&self) -> Option<Decimal> {
        match self.split {
            TaxSplit::Intra { cgst, .. } => Some(cgst),
            TaxSplit::Inter { .. } => None,
        }
    }

    pub fn sgst(&self) -> Option<Decimal> {
        match self.split {
            TaxSplit::Intra { sgst, .. } => Some(sgst),
            TaxSplit::Inter { .. } => None,
        }
    }

    pub fn igst(&self) -> Option<Decimal> {
        match self.split {
            TaxSplit::Inter { igst } => Some(igst),
            TaxSplit::Intra { .. } => None,
        }
    }
}
