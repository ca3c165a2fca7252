use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationInput, CalculationResult};

/// A recorded calculation.
///
/// Serialized as `{"amount", "rate", "total", "type"}`. Values are kept
/// exactly as computed; rounding only happens when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub amount: Decimal,
    pub rate: Decimal,
    pub total: Decimal,
    #[serde(rename = "type")]
    pub label: String,
}

impl HistoryEntry {
    pub fn new(
        amount: Decimal,
        rate: Decimal,
        total: Decimal,
        label: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            rate,
            total,
            label: label.into(),
        }
    }

    /// Entry describing `input` and the result computed from it.
    pub fn from_calculation(
        input: &CalculationInput,
        result: &CalculationResult,
    ) -> Self {
        Self::new(input.amount, input.rate, result.total_amount, input.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn label_is_serialized_under_type_key() {
        let entry = HistoryEntry::new(dec!(1000), dec!(18), dec!(1180), "Excl. Intra");

        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["type"], "Excl. Intra");
        assert!(json.get("label").is_none());
    }

    #[test]
    fn deserializes_numeric_json_values() {
        let json = r#"{"amount":1000,"rate":18,"total":1180,"type":"Excl. Intra"}"#;

        let entry: HistoryEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry, HistoryEntry::new(dec!(1000), dec!(18), dec!(1180), "Excl. Intra"));
    }
}
