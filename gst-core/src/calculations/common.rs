//! Common utility functions for GST calculations.
//!
//! This module provides shared functionality used by the engine, the input
//! coercion layer and the formatters: rounding and range clamping.

use rust_decimal::Decimal;

/// Largest amount read from typed or floating point input (10^20).
///
/// Totals reachable from such amounts, at most twice this, are still
/// computed to well below a millionth.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_661_992_960, 1_808_227_885, 5, false, 0);

/// Ceiling applied by the engine (10^26), where `amount * rate` still fits
/// in a [`Decimal`]. Far above any total reachable from [`MAX_AMOUNT`].
pub const MAX_WORKING_AMOUNT: Decimal =
    Decimal::from_parts(3_825_205_248, 3_704_098_002, 5_421_010, false, 0);

/// Upper bound of a tax rate, in percent.
pub const MAX_RATE: Decimal = Decimal::ONE_HUNDRED;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use gst_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps an amount into `[0, MAX_WORKING_AMOUNT]`.
pub fn clamp_amount(amount: Decimal) -> Decimal {
    max(amount, Decimal::ZERO).min(MAX_WORKING_AMOUNT)
}

/// Clamps a rate into `[0, 100]`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use gst_core::calculations::common::clamp_rate;
///
/// assert_eq!(clamp_rate(dec!(-3)), dec!(0));
/// assert_eq!(clamp_rate(dec!(18)), dec!(18));
/// assert_eq!(clamp_rate(dec!(140)), dec!(100));
/// ```
pub fn clamp_rate(rate: Decimal) -> Decimal {
    max(rate, Decimal::ZERO).min(MAX_RATE)
}
