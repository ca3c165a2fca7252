//! Coercion of free-text user input into calculator values.
//!
//! Amounts and custom rates never fail to parse: the leading numeric part of
//! the text is used (`"12abc"` is 12), anything unreadable becomes zero, and
//! results are clamped into their valid ranges. Only preset selection is
//! strict, since a preset must be one of the configured slabs.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{MAX_AMOUNT, clamp_amount, clamp_rate};

/// The GST slabs offered as presets.
pub const DEFAULT_PRESETS: [Decimal; 5] = [dec!(0), dec!(5), dec!(12), dec!(18), dec!(28)];

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("numeric prefix pattern")
});

/// Error returned when a preset rate cannot be selected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid rate '{0}'")]
    InvalidNumber(String),

    #[error("rate {rate}% is not a preset (available: {available})")]
    UnknownPreset { rate: Decimal, available: String },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_numeric_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Reads the leading number of `s`, if there is one.
fn leading_number(s: &str) -> Option<Decimal> {
    let normalized = normalize_numeric_input(s);
    let matched = NUMERIC_PREFIX.find(&normalized)?.as_str();
    let number = matched.strip_prefix('+').unwrap_or(matched);

    Decimal::from_str(number.trim_end_matches('.'))
        .or_else(|_| Decimal::from_scientific(number))
        .ok()
        .or_else(|| number.parse::<f64>().ok().map(coerce_f64))
}

/// Converts a float into a non-negative decimal.
///
/// NaN, infinities and negatives become zero; values above [`MAX_AMOUNT`]
/// are capped there.
pub fn coerce_f64(value: f64) -> Decimal {
    if !value.is_finite() || value <= 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).map_or(MAX_AMOUNT, cap_entered)
}

fn cap_entered(amount: Decimal) -> Decimal {
    clamp_amount(amount).min(MAX_AMOUNT)
}

/// Parses an entered amount.
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`). Empty or
/// unreadable input and negative values are treated as 0. Amounts above
/// [`MAX_AMOUNT`] are capped there.
pub fn parse_amount(s: &str) -> Decimal {
    match leading_number(s) {
        Some(amount) => cap_entered(amount),
        None => {
            if !s.trim().is_empty() {
                debug!(input = %s, "unreadable amount treated as zero");
            }
            Decimal::ZERO
        }
    }
}

/// Parses a custom rate, clamped to `[0, 100]`. Unreadable input is 0.
pub fn parse_rate(s: &str) -> Decimal {
    match leading_number(s) {
        Some(rate) => clamp_rate(rate),
        None => {
            if !s.trim().is_empty() {
                debug!(input = %s, "unreadable rate treated as zero");
            }
            Decimal::ZERO
        }
    }
}

/// Picks the preset matching `s`.
///
/// # Errors
///
/// * [`InputError::InvalidNumber`] when `s` is not a number
/// * [`InputError::UnknownPreset`] when the number is not in `presets`
pub fn select_preset(
    s: &str,
    presets: &[Decimal],
) -> Result<Decimal, InputError> {
    let normalized = normalize_numeric_input(s);
    let normalized = normalized.trim_end_matches('%');
    let rate = Decimal::from_str(normalized)
        .map_err(|_| InputError::InvalidNumber(s.trim().to_string()))?;

    presets
        .iter()
        .copied()
        .find(|preset| *preset == rate)
        .ok_or_else(|| InputError::UnknownPreset {
            rate,
            available: presets
                .iter()
                .map(|p| p.normalize().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("1,234.56"), dec!(1234.56));
        assert_eq!(parse_amount("1,00,000"), dec!(100000));
    }

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("  123.45  "), dec!(123.45));
    }

    #[test]
    fn parse_amount_empty_or_garbage_is_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("."), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_uses_leading_number() {
        assert_eq!(parse_amount("12abc"), dec!(12));
        assert_eq!(parse_amount("7.5 rupees"), dec!(7.5));
        assert_eq!(parse_amount("12."), dec!(12));
        assert_eq!(parse_amount(".5"), dec!(0.5));
    }

    #[test]
    fn parse_amount_reads_exponents() {
        assert_eq!(parse_amount("1.5e3"), dec!(1500));
    }

    #[test]
    fn parse_amount_negative_is_zero() {
        assert_eq!(parse_amount("-250"), Decimal::ZERO);
    }

    #[test]
    fn parse_amount_keeps_large_amounts_exact() {
        assert_eq!(parse_amount("2000000000000000"), dec!(2000000000000000));
        assert_eq!(
            parse_amount("1,062,000,000,000,000.50"),
            dec!(1062000000000000.50)
        );
        assert_eq!(parse_amount("1e20"), MAX_AMOUNT);
    }

    #[test]
    fn parse_amount_caps_beyond_entry_ceiling() {
        assert_eq!(parse_amount("1e25"), MAX_AMOUNT);
        assert_eq!(parse_amount("1e40"), MAX_AMOUNT);
    }

    #[test]
    fn parse_rate_clamps_into_range() {
        assert_eq!(parse_rate("-4"), Decimal::ZERO);
        assert_eq!(parse_rate("12.5"), dec!(12.5));
        assert_eq!(parse_rate("140"), dec!(100));
        assert_eq!(parse_rate(""), Decimal::ZERO);
    }

    #[test]
    fn coerce_f64_handles_non_finite() {
        assert_eq!(coerce_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(coerce_f64(f64::NEG_INFINITY), Decimal::ZERO);
        assert_eq!(coerce_f64(-1.0), Decimal::ZERO);
        assert_eq!(coerce_f64(2.5), dec!(2.5));
        assert_eq!(coerce_f64(1e300), MAX_AMOUNT);
    }

    #[test]
    fn coerce_f64_keeps_large_whole_amounts() {
        assert_eq!(coerce_f64(2e15), dec!(2000000000000000));
        assert_eq!(coerce_f64(1e22), MAX_AMOUNT);
    }

    #[test]
    fn select_preset_matches_configured_slab() {
        assert_eq!(select_preset("18", &DEFAULT_PRESETS), Ok(dec!(18)));
        assert_eq!(select_preset("5%", &DEFAULT_PRESETS), Ok(dec!(5)));
        assert_eq!(select_preset("12.0", &DEFAULT_PRESETS), Ok(dec!(12)));
    }

    #[test]
    fn select_preset_rejects_other_rates() {
        let err = select_preset("17", &DEFAULT_PRESETS).unwrap_err();

        assert_eq!(
            err,
            InputError::UnknownPreset {
                rate: dec!(17),
                available: "0, 5, 12, 18, 28".to_string(),
            }
        );
        assert_eq!(
            select_preset("eighteen", &DEFAULT_PRESETS),
            Err(InputError::InvalidNumber("eighteen".to_string()))
        );
    }
}
