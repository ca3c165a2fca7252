//! Plain-text rendering of calculator output.

use std::fmt::Write;

use gst_core::calculations::{PriceCategory, PriceProjection};
use gst_core::format::{CURRENCY_SYMBOL, format_inr, format_rate};
use gst_core::{CalculationInput, CalculationResult, HistoryEntry, TaxSplit};
use rust_decimal::Decimal;

const LABEL_WIDTH: usize = 16;

fn line(
    out: &mut String,
    label: &str,
    value: &str,
) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{value:>18}");
}

/// The breakdown shown after every recalculation.
pub fn render_breakdown(
    input: &CalculationInput,
    result: &CalculationResult,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} @ {}%", input.label(), format_rate(input.rate));

    line(&mut out, "Net amount", &format_inr(result.net_amount));
    match result.split {
        TaxSplit::Intra { cgst, sgst } => {
            let half = format_rate(input.rate / Decimal::TWO);
            line(&mut out, &format!("CGST ({half}%)"), &format_inr(cgst));
            line(&mut out, &format!("SGST ({half}%)"), &format_inr(sgst));
        }
        TaxSplit::Inter { igst } => {
            let rate = format_rate(input.rate);
            line(&mut out, &format!("IGST ({rate}%)"), &format_inr(igst));
        }
    }
    line(&mut out, "Total tax", &format_inr(result.tax_amount));
    line(&mut out, "Total", &format_inr(result.total_amount));
    out
}

/// One compact line per CSV row.
pub fn render_batch_row(
    row: usize,
    input: &CalculationInput,
    result: &CalculationResult,
) -> String {
    format!(
        "{row:>4}  {:<12} {:>5}%  net {}  tax {}  total {}",
        input.label(),
        format_rate(input.rate),
        format_inr(result.net_amount),
        format_inr(result.tax_amount),
        format_inr(result.total_amount),
    )
}

/// Entries as given, which is newest first when they come from
/// [`gst_core::HistoryStore::list`]. Amounts are shown as entered.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No calculations yet.\n".to_string();
    }

    let mut out = String::from("Recent calculations:\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "  {CURRENCY_SYMBOL}{} @ {}%  {:<12} {}",
            entry.amount.normalize(),
            format_rate(entry.rate),
            entry.label,
            format_inr(entry.total),
        );
    }
    out
}

pub fn render_projection(
    category: PriceCategory,
    years: u32,
    projection: &PriceProjection,
) -> String {
    let mut out = String::new();
    let unit = if years == 1 { "year" } else { "years" };
    let _ = writeln!(out, "Price outlook for {} in {years} {unit}", category.as_str());
    line(&mut out, "Current price", &format_inr(projection.current_price));
    line(&mut out, "Projected price", &format_inr(projection.projected_price));
    line(
        &mut out,
        "Inflation",
        &format!("+{:.1}%", projection.inflation_percent),
    );
    line(&mut out, "GST outlook", projection.outlook.label());
    out
}

pub fn render_help(presets: &[Decimal]) -> String {
    let presets = presets
        .iter()
        .map(|rate| format_rate(*rate))
        .collect::<Vec<_>>()
        .join(", ");
    let categories = PriceCategory::all()
        .iter()
        .map(PriceCategory::as_str)
        .collect::<Vec<_>>()
        .join("|");

    format!(
        "Commands:
  amount <value>           set the amount
  rate <preset>            pick a preset rate ({presets})
  custom <rate>            set any rate between 0 and 100
  excl | incl              amount excludes / includes GST
  intra | inter            within a state (CGST + SGST) / across states (IGST)
  history                  show recent calculations
  clear                    forget recent calculations
  predict <{categories}> <years>
                           project the current amount forward
  help                     show this text
  quit                     leave
"
    )
}

#[cfg(test)]
mod tests {
    use gst_core::calculations::{GstOutlook, PriceProjector};
    use gst_core::{Jurisdiction, PriceBasis, compute};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn intra_state_breakdown_shows_cgst_and_sgst() {
        let input = CalculationInput::new(
            dec!(1000),
            dec!(18),
            PriceBasis::Exclusive,
            Jurisdiction::IntraState,
        );

        let text = render_breakdown(&input, &compute(&input));

        assert!(text.starts_with("Excl. Intra @ 18%\n"));
        assert!(text.contains("CGST (9%)"));
        assert!(text.contains("SGST (9%)"));
        assert!(text.contains("₹90.00"));
        assert!(text.contains("₹1,180.00"));
        assert!(!text.contains("IGST"));
    }

    #[test]
    fn inter_state_breakdown_shows_igst_only() {
        let input = CalculationInput::new(
            dec!(1180),
            dec!(18),
            PriceBasis::Inclusive,
            Jurisdiction::InterState,
        );

        let text = render_breakdown(&input, &compute(&input));

        assert!(text.contains("IGST (18%)"));
        assert!(text.contains("₹180.00"));
        assert!(text.contains("₹1,000.00"));
        assert!(!text.contains("CGST"));
    }

    #[test]
    fn odd_rate_halves_keep_their_fraction() {
        let input = CalculationInput::new(
            dec!(100),
            dec!(5),
            PriceBasis::Exclusive,
            Jurisdiction::IntraState,
        );

        let text = render_breakdown(&input, &compute(&input));

        assert!(text.contains("CGST (2.5%)"));
    }

    #[test]
    fn empty_history_has_placeholder() {
        assert_eq!(render_history(&[]), "No calculations yet.\n");
    }

    #[test]
    fn history_shows_raw_amount_and_rounded_total() {
        let entries = vec![HistoryEntry::new(
            dec!(999.999),
            dec!(18),
            dec!(1179.99882),
            "Excl. Intra",
        )];

        let text = render_history(&entries);

        assert!(text.contains("₹999.999 @ 18%"));
        assert!(text.contains("Excl. Intra"));
        assert!(text.contains("₹1,180.00"));
    }

    #[test]
    fn projection_shows_signed_inflation_and_outlook() {
        let projection = PriceProjector::new()
            .project(dec!(1000), PriceCategory::Luxury, 2)
            .expect("valid projection");

        let text = render_projection(PriceCategory::Luxury, 2, &projection);

        assert_eq!(projection.outlook, GstOutlook::LikelyIncrease);
        assert!(text.contains("luxury in 2 years"));
        assert!(text.contains("+24.0%"));
        assert!(text.contains("Likely Increase"));
    }

    #[test]
    fn batch_row_is_a_single_line() {
        let input = CalculationInput::new(
            dec!(500),
            dec!(12),
            PriceBasis::Exclusive,
            Jurisdiction::InterState,
        );

        let text = render_batch_row(3, &input, &compute(&input));

        assert!(!text.contains('\n'));
        assert!(text.contains("total ₹560.00"));
    }

    #[test]
    fn help_lists_presets_and_categories() {
        let text = render_help(&[dec!(0), dec!(5), dec!(28)]);

        assert!(text.contains("(0, 5, 28)"));
        assert!(text.contains("electronics|essentials|luxury"));
    }
}
