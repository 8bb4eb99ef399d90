//! Component cost calculators: material, print, finishing and options.
//!
//! Every calculator treats a missing entity or field as "no contribution"
//! and returns money rounded to two places. Arithmetic saturates at the
//! `Decimal` range instead of panicking.

use rust_decimal::Decimal;

use crate::domain::aggregates::{OptionKind, OptionSelection, Product, Selections};
use crate::domain::catalog::{Finishing, Material, PrintMethod};
use crate::domain::value_objects::{round_money, Quantity};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaterialCost {
    pub cost: Decimal,
    /// Area in m² or the quantity, whichever the cost was multiplied by.
    pub multiplier: Decimal,
}

pub fn material_cost(material: Option<&Material>, quantity: Quantity, area: Option<Decimal>) -> MaterialCost {
    let Some(material) = material else { return MaterialCost::default() };
    let unit_cost = material.unit_cost();
    let multiplier = match area.filter(|a| !a.is_zero()) {
        Some(area) if material.is_area_based() => area,
        _ => quantity.as_decimal(),
    };
    MaterialCost { cost: round_money(unit_cost.saturating_mul(multiplier)), multiplier }
}

pub fn print_cost(print_method: Option<&PrintMethod>, quantity: Quantity, area: Option<Decimal>) -> Decimal {
    let Some(method) = print_method else { return Decimal::ZERO };
    let area_cost = match (method.cost_per_m2, area) {
        (Some(rate), Some(area)) => rate.saturating_mul(area),
        _ => Decimal::ZERO,
    };
    let sheet_cost = method.cost_per_sheet.map_or(Decimal::ZERO, |rate| rate.saturating_mul(quantity.as_decimal()));
    round_money(area_cost.saturating_add(sheet_cost))
}

pub fn finishing_cost(operations: &[Finishing], quantity: Quantity, area: Option<Decimal>) -> Decimal {
    let total = operations
        .iter()
        .map(|op| {
            let per_area = match (op.cost_per_m2, area) {
                (Some(rate), Some(area)) => rate.saturating_mul(area),
                _ => Decimal::ZERO,
            };
            [
                op.cost_fix.unwrap_or_default(),
                op.cost_per_unit.unwrap_or_default().saturating_mul(quantity.as_decimal()),
                per_area,
                op.price_modifier.unwrap_or_default(),
            ]
            .into_iter()
            .fold(Decimal::ZERO, Decimal::saturating_add)
        })
        .fold(Decimal::ZERO, Decimal::saturating_add);
    round_money(total)
}

/// Sum of the price modifiers of every selected option value.
///
/// Checkbox options accept several values; values the product does not
/// define contribute nothing. Not rounded.
pub fn option_value_cost(product: &Product, selections: &Selections) -> Decimal {
    product
        .options
        .iter()
        .map(|option| {
            let modifier = |value: &str| option.value(value).and_then(|v| v.price_modifier).unwrap_or_default();
            match (option.kind, selections.option(&option.id)) {
                (OptionKind::Checkbox, Some(OptionSelection::Multiple(values))) => values.iter().map(|v| modifier(v.as_str())).fold(Decimal::ZERO, Decimal::saturating_add),
                (_, Some(OptionSelection::Single(value))) => modifier(value.as_str()),
                _ => Decimal::ZERO,
            }
        })
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
