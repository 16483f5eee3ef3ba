//! Money arithmetic for receipt totals.
//!
//! All amounts are `rust_decimal::Decimal`, never binary floating point.
//! Rounding is half-away-from-zero to two decimal places, applied to each
//! published figure independently AFTER computation. Rounding per line item
//! would accumulate differently and is deliberately avoided; as a
//! consequence `total` can differ by up to 0.01 from the sum of the rounded
//! `subtotal` and `vat`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::NewReceiptItem;

/// Number of decimal places carried by published amounts.
pub const MONEY_SCALE: u32 = 2;

/// The three derived figures of a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReceiptTotals {
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total: Decimal,
}

/// Rounds an amount to two decimal places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes subtotal, VAT and total for a sequence of line items.
///
/// `vat_rate` is a percentage in [0, 100]. This is a total function over
/// well-formed input: it performs no validation (the assembly step rejects
/// negative quantities and prices before calling it) and has no side
/// effects. An empty item sequence yields all zeroes.
pub fn compute_totals(items: &[NewReceiptItem], vat_rate: Decimal) -> ReceiptTotals {
    let subtotal: Decimal = items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.price)
        .sum();
    let vat = subtotal * vat_rate / Decimal::from(100);
    let total = subtotal + vat;

    ReceiptTotals {
        subtotal: round_money(subtotal),
        vat: round_money(vat),
        total: round_money(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(description: &str, quantity: i32, price: &str) -> NewReceiptItem {
        NewReceiptItem {
            description: description.to_string(),
            quantity,
            price: price.parse().expect("test price must parse"),
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test decimal must parse")
    }

    #[test]
    fn empty_items_yield_zeroes() {
        let totals = compute_totals(&[], dec("7.5"));
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.vat, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn zero_rate_widget_order() {
        // 2 x 500 at 0% VAT
        let totals = compute_totals(&[item("Widget", 2, "500")], Decimal::ZERO);
        assert_eq!(totals.subtotal, dec("1000"));
        assert_eq!(totals.vat, Decimal::ZERO);
        assert_eq!(totals.total, dec("1000"));
    }

    #[test]
    fn fractional_vat_rate() {
        // 1 x 900 at 7.5% VAT
        let totals = compute_totals(&[item("Service", 1, "900")], dec("7.5"));
        assert_eq!(totals.subtotal, dec("900"));
        assert_eq!(totals.vat, dec("67.5"));
        assert_eq!(totals.total, dec("967.5"));
    }

    #[test]
    fn multiple_items_sum_before_rounding() {
        let items = [item("Coffee", 3, "2.50"), item("Pastry", 2, "1.75")];
        let totals = compute_totals(&items, dec("10"));
        assert_eq!(totals.subtotal, dec("11.00"));
        assert_eq!(totals.vat, dec("1.10"));
        assert_eq!(totals.total, dec("12.10"));
    }

    #[test]
    fn rounds_each_figure_independently_after_summing() {
        // subtotal_raw = 1.005 and vat_raw = 1.005 both round up to 1.01,
        // while total_raw = 2.010 stays 2.01. The published total is NOT the
        // sum of the published components.
        let totals = compute_totals(&[item("Oddity", 1, "1.005")], dec("100"));
        assert_eq!(totals.subtotal, dec("1.01"));
        assert_eq!(totals.vat, dec("1.01"));
        assert_eq!(totals.total, dec("2.01"));
        assert_ne!(totals.total, totals.subtotal + totals.vat);
    }

    #[test]
    fn half_rounds_away_from_zero() {
        assert_eq!(round_money(dec("0.125")), dec("0.13"));
        assert_eq!(round_money(dec("0.135")), dec("0.14"));
        assert_eq!(round_money(dec("2.675")), dec("2.68"));
    }

    #[test]
    fn computation_is_deterministic() {
        let items = [item("Service", 1, "900")];
        let first = compute_totals(&items, dec("7.5"));
        let second = compute_totals(&items, dec("7.5"));
        assert_eq!(first, second);
    }
}
