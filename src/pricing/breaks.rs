//! Quantity price-break selection

use rust_decimal::Decimal;

use crate::domain::aggregates::{PriceBreak, PricingStrategy};
use crate::domain::value_objects::Quantity;

/// Pick the break with the highest `min_quantity` that covers `quantity`.
///
/// Breaks sharing a `min_quantity` keep their declared order.
pub fn select_price_break(breaks: &[PriceBreak], quantity: Quantity) -> Option<&PriceBreak> {
    let mut ordered: Vec<&PriceBreak> = breaks.iter().collect();
    ordered.sort_by(|a, b| b.min_quantity.cmp(&a.min_quantity));
    ordered.into_iter().find(|b| b.covers(quantity))
}

/// Per-unit base price after breaks, with the break that produced it.
pub fn unit_base_price(pricing: &PricingStrategy, quantity: Quantity) -> (Decimal, Option<&PriceBreak>) {
    match select_price_break(&pricing.price_breaks, quantity) {
        Some(b) => (b.price_per_unit, Some(b)),
        None => (pricing.base_price, None),
    }
}
