//! Rendering of amounts and rates in the en-IN / INR convention.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;

pub const CURRENCY_SYMBOL: &str = "₹";

/// Formats `value` as rupees with two decimals and Indian digit grouping.
///
/// ```
/// use rust_decimal_macros::dec;
/// use gst_core::format::format_inr;
///
/// assert_eq!(format_inr(dec!(1180)), "₹1,180.00");
/// assert_eq!(format_inr(dec!(12345678.9)), "₹1,23,45,678.90");
/// ```
pub fn format_inr(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(2);

    let text = rounded.to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!(
        "{}{CURRENCY_SYMBOL}{}.{fraction}",
        if negative { "-" } else { "" },
        group_indian(whole)
    )
}

/// Formats a rate without trailing zeros, e.g. `9` or `2.5`.
pub fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}

/// Groups digits as lakhs and crores: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
