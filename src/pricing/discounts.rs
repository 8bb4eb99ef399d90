//! Sequential discount application

use rust_decimal::Decimal;

use crate::domain::aggregates::{Discount, DiscountKind};
use crate::domain::value_objects::Quantity;

/// Total discount for `subtotal`, applying discounts in declared order.
///
/// Percentages are taken from the balance left by earlier discounts, so two
/// 10% discounts on 100 remove 19, not 20. Discounts whose `min_quantity`
/// is above `quantity` are skipped. The result is not rounded, may exceed
/// `subtotal` and saturates at the `Decimal` range.
pub fn total_discount(discounts: &[Discount], subtotal: Decimal, quantity: Quantity) -> Decimal {
    let mut running = subtotal;
    let mut total = Decimal::ZERO;
    for discount in discounts {
        if discount.min_quantity.is_some_and(|min| quantity.value() < min) {
            continue;
        }
        let amount = match discount.kind {
            DiscountKind::Percentage => running.saturating_mul(discount.value) / Decimal::ONE_HUNDRED,
            DiscountKind::Fixed => discount.value,
        };
        total = total.saturating_add(amount);
        running = running.saturating_sub(amount);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(value: i64) -> Discount { Discount { kind: DiscountKind::Percentage, value: Decimal::new(value, 0), min_quantity: None, name: None } }
    fn flat(value: i64) -> Discount { Discount { kind: DiscountKind::Fixed, value: Decimal::new(value, 0), min_quantity: None, name: None } }

    #[test]
    fn test_percentages_compound() {
        let total = total_discount(&[pct(10), pct(10)], Decimal::new(100, 0), Quantity::clamped(1));
        assert_eq!(total, Decimal::new(19, 0));
    }

    #[test]
    fn test_flat_then_percentage() {
        let total = total_discount(&[flat(20), pct(50)], Decimal::new(100, 0), Quantity::clamped(1));
        assert_eq!(total, Decimal::new(60, 0));
    }

    #[test]
    fn test_min_quantity_gate() {
        let bulk = Discount { min_quantity: Some(100), ..pct(15) };
        let discounts = [bulk, flat(5)];
        assert_eq!(total_discount(&discounts, Decimal::new(200, 0), Quantity::clamped(99)), Decimal::new(5, 0));
        assert_eq!(total_discount(&discounts, Decimal::new(200, 0), Quantity::clamped(100)), Decimal::new(35, 0));
    }

    #[test]
    fn test_discount_may_exceed_subtotal() {
        assert_eq!(total_discount(&[flat(150)], Decimal::new(100, 0), Quantity::clamped(1)), Decimal::new(150, 0));
        assert_eq!(total_discount(&[], Decimal::new(100, 0), Quantity::clamped(1)), Decimal::ZERO);
    }

    #[test]
    fn test_huge_discounts_saturate() {
        let flat_max = Discount { value: Decimal::MAX, ..flat(0) };
        assert_eq!(total_discount(&[flat_max.clone(), flat_max], Decimal::new(100, 0), Quantity::clamped(1)), Decimal::MAX);
        let steep = Discount { value: Decimal::new(1000, 0), ..pct(0) };
        assert_eq!(total_discount(&[steep], Decimal::MAX, Quantity::clamped(1)), Decimal::MAX / Decimal::ONE_HUNDRED);
    }
}
