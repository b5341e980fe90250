// invoice-pdf-service/src/calculator.rs

//! Line and total arithmetic. Inputs are expected to have passed
//! `InvoiceRequest::validate`, which guarantees every product and sum below
//! fits the decimal range.

use crate::models::{ComputedLine, ComputedTotals, LineItem};
use rust_decimal::{Decimal, RoundingStrategy};

/// Numbers each item from 1 and multiplies out its total, keeping input order.
pub fn compute_lines(items: &[LineItem]) -> Vec<ComputedLine> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let line_total = item.qty * item.unit_price;
            ComputedLine {
                no: index + 1,
                model: item.model.clone(),
                qty: item.qty,
                unit: item.unit.clone(),
                unit_price: item.unit_price,
                line_total,
                line_total_formatted: format_amount(line_total),
            }
        })
        .collect()
}

pub fn subtotal(lines: &[ComputedLine]) -> Decimal {
    lines.iter().map(|line| line.line_total).sum()
}

/// Applies a percentage tax rate. Numeric fields keep full precision, only
/// the formatted strings are rounded.
pub fn aggregate(subtotal: Decimal, tax_rate: Decimal) -> ComputedTotals {
    let tax_amount = subtotal * tax_rate / Decimal::ONE_HUNDRED;
    let grand_total = subtotal + tax_amount;

    ComputedTotals {
        subtotal,
        tax_amount,
        grand_total,
        subtotal_formatted: format_amount(subtotal),
        tax_amount_formatted: format_amount(tax_amount),
        grand_total_formatted: format_amount(grand_total),
    }
}

/// Two fixed decimal places, half away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(model: &str, qty: &str, unit_price: &str) -> LineItem {
        LineItem {
            model: model.to_string(),
            qty: dec(qty),
            unit_price: dec(unit_price),
            unit: "Pcs".to_string(),
        }
    }

    #[test]
    fn worked_example_matches_expected_totals() {
        let items = vec![item("Widget", "2", "50.0"), item("Gadget", "1", "25.5")];

        let lines = compute_lines(&items);
        let totals = aggregate(subtotal(&lines), dec("10"));

        assert_eq!(totals.subtotal, dec("125.5"));
        assert_eq!(totals.tax_amount, dec("12.55"));
        assert_eq!(totals.grand_total, dec("138.05"));
        assert_eq!(totals.subtotal_formatted, "125.50");
        assert_eq!(totals.tax_amount_formatted, "12.55");
        assert_eq!(totals.grand_total_formatted, "138.05");
    }

    #[test]
    fn lines_are_numbered_from_one_in_input_order() {
        let items = vec![
            item("First", "1", "1"),
            item("Second", "1", "2"),
            item("Third", "1", "3"),
        ];

        let lines = compute_lines(&items);

        let numbered: Vec<(usize, &str)> =
            lines.iter().map(|l| (l.no, l.model.as_str())).collect();
        assert_eq!(numbered, vec![(1, "First"), (2, "Second"), (3, "Third")]);
    }

    #[test]
    fn line_total_is_exact_product() {
        let lines = compute_lines(&[item("Bolt", "0.333", "0.333")]);

        assert_eq!(lines[0].line_total, dec("0.110889"));
        assert_eq!(lines[0].line_total_formatted, "0.11");
    }

    #[test]
    fn no_rounding_before_summation() {
        // Each line rounds to 0.00 on its own, the sum does not.
        let items = vec![
            item("A", "1", "0.004"),
            item("B", "1", "0.004"),
            item("C", "1", "0.004"),
        ];

        let lines = compute_lines(&items);
        assert!(lines.iter().all(|l| l.line_total_formatted == "0.00"));
        assert_eq!(format_amount(subtotal(&lines)), "0.01");
    }

    #[test]
    fn subtotal_is_independent_of_order() {
        let mut items = vec![
            item("A", "3", "19.99"),
            item("B", "0.5", "7.25"),
            item("C", "12", "0.01"),
        ];
        let forward = subtotal(&compute_lines(&items));
        items.reverse();
        let backward = subtotal(&compute_lines(&items));

        assert_eq!(forward, backward);
        assert_eq!(forward, dec("63.715"));
    }

    #[test]
    fn empty_items_produce_zero_totals() {
        let totals = aggregate(subtotal(&[]), dec("15"));

        assert_eq!(totals.subtotal_formatted, "0.00");
        assert_eq!(totals.tax_amount_formatted, "0.00");
        assert_eq!(totals.grand_total_formatted, "0.00");
    }

    #[test]
    fn tax_follows_rate_across_range() {
        let base = dec("200");
        for (rate, tax, grand) in [
            ("0", "0", "200"),
            ("7.5", "15", "215"),
            ("33.33", "66.66", "266.66"),
            ("100", "200", "400"),
        ] {
            let totals = aggregate(base, dec(rate));
            assert_eq!(totals.tax_amount, dec(tax), "rate {rate}");
            assert_eq!(totals.grand_total, dec(grand), "rate {rate}");
        }
    }

    #[test]
    fn totals_keep_full_precision() {
        let totals = aggregate(dec("10.01"), dec("12.5"));

        assert_eq!(totals.tax_amount, dec("1.25125"));
        assert_eq!(totals.tax_amount_formatted, "1.25");
        assert_eq!(totals.grand_total, dec("11.26125"));
        assert_eq!(totals.grand_total_formatted, "11.26");
    }

    #[test]
    fn formatting_always_shows_two_decimals() {
        assert_eq!(format_amount(dec("100")), "100.00");
        assert_eq!(format_amount(dec("7.5")), "7.50");
        assert_eq!(format_amount(dec("0")), "0.00");
        assert_eq!(format_amount(dec("2.005")), "2.01");
        assert_eq!(format_amount(dec("1234567.891")), "1234567.89");
    }
}
