//! Product price calculator
//!
//! Resolves a product, the customer's selections and the pre-resolved
//! catalog entities into an itemized [`PriceSummary`]:
//!
//! 1. normalize quantity and surface area
//! 2. pick the per-unit base price from the quantity breaks
//! 3. cost material, print, finishing and options
//! 4. derive the base component from the pricing type
//! 5. sum the subtotal and apply discounts in order
//!
//! Pure and infallible: missing catalog data costs nothing, a bad formula
//! falls back to `unit base * quantity` and amounts beyond the `Decimal`
//! range saturate at its bounds.

use rust_decimal::Decimal;

use super::breaks::unit_base_price;
use super::costs::{finishing_cost, material_cost, option_value_cost, print_cost};
use super::discounts::total_discount;
use super::formula::{self, FormulaVariables};
use super::summary::{PriceBreakdown, PriceCalculationContext, PriceSummary};
use crate::domain::aggregates::{PricingType, Product, Selections};
use crate::domain::value_objects::{area_in_square_meters, round_money};

const DEFAULT_DIMENSION_UNIT: &str = "mm";

pub fn calculate(product: &Product, selections: &Selections, context: &PriceCalculationContext) -> PriceSummary {
    let quantity = selections.normalized_quantity();
    let qty = quantity.as_decimal();
    let dimension = selections.dimension.as_ref();
    let unit = dimension
        .and_then(|d| d.unit.as_deref())
        .or_else(|| product.dimension_unit())
        .unwrap_or(DEFAULT_DIMENSION_UNIT);
    let area = dimension.and_then(|d| area_in_square_meters(d.width, d.height, unit));

    let pricing = &product.pricing;
    let (unit_base, applied_break) = unit_base_price(pricing, quantity);

    let material = material_cost(context.material.as_ref(), quantity, area);
    let print = print_cost(context.print_method.as_ref(), quantity, area);
    let finishing = finishing_cost(&context.finishing, quantity, area);
    let option_value = option_value_cost(product, selections);
    let rule_adjustment = context.option_price_adjustments.unwrap_or_default();
    let options = round_money(option_value.saturating_add(rule_adjustment));

    let base = round_money(match pricing.pricing_type {
        PricingType::Fixed => unit_base,
        PricingType::PerUnit | PricingType::PerWeight => unit_base.saturating_mul(qty),
        PricingType::PerSqm => unit_base.saturating_mul(area.unwrap_or(Decimal::ONE)),
        PricingType::Formula => {
            let vars = FormulaVariables {
                base: unit_base,
                qty,
                area: area.unwrap_or(Decimal::ONE),
                material_cost: material.cost,
                print_cost: print,
                finish_cost: finishing,
                option_cost: options,
            };
            formula::evaluate_or(pricing.formula.as_deref(), &vars, unit_base.saturating_mul(qty))
        }
        PricingType::Unknown => unit_base,
    });

    let subtotal = [base, material.cost, print, finishing, options]
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let discounts = round_money(total_discount(&pricing.discounts, subtotal, quantity));
    let total = subtotal.saturating_sub(discounts).max(Decimal::ZERO);
    let price_per_unit = round_money(total / qty);

    if subtotal == Decimal::MAX || subtotal == Decimal::MIN {
        tracing::warn!(product_id = %product.id, %quantity, "price exceeds the decimal range, saturated");
    }

    tracing::debug!(
        product_id = %product.id,
        pricing_type = pricing.pricing_type.as_str(),
        %quantity,
        %subtotal,
        %total,
        "calculated product price"
    );

    let applied_break = applied_break.cloned();
    PriceSummary {
        base,
        material_cost: material.cost,
        print_cost: print,
        finishing_cost: finishing,
        option_cost: options,
        discounts,
        subtotal,
        total,
        price_per_unit,
        quantity,
        area,
        pricing_type: pricing.pricing_type,
        applied_price_break: applied_break.clone(),
        breakdown: PriceBreakdown {
            option_value_cost: option_value,
            rule_adjustment,
            material_multiplier: material.multiplier,
            pricing_method: Some(pricing.pricing_type),
            applied_break,
            area_in_square_meters: area,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Finishing, Material, PrintMethod};

    fn product(json: &str) -> Product { serde_json::from_str(json).unwrap() }
    fn selections(json: &str) -> Selections { serde_json::from_str(json).unwrap() }
    fn price(p: &Product, s: &Selections) -> PriceSummary { calculate(p, s, &PriceCalculationContext::default()) }

    fn flyer() -> Product {
        product(r#"{"id": "flyer", "pricing": {"type": "per_unit", "basePrice": 35,
            "priceBreaks": [{"minQuantity": 10, "maxQuantity": 50, "pricePerUnit": 30}]}}"#)
    }

    #[test]
    fn test_per_unit_with_price_break() {
        let s = price(&flyer(), &Selections::with_quantity(20));
        assert_eq!(s.base, Decimal::new(600, 0));
        assert_eq!(s.subtotal, Decimal::new(600, 0));
        assert_eq!(s.total, Decimal::new(600, 0));
        assert_eq!(s.price_per_unit, Decimal::new(30, 0));
        assert_eq!(s.quantity.value(), 20);
        assert_eq!(s.applied_price_break.as_ref().map(|b| b.min_quantity), Some(10));
        assert_eq!(s.breakdown.applied_break, s.applied_price_break);
        assert_eq!(s.breakdown.pricing_method, Some(PricingType::PerUnit));
    }

    #[test]
    fn test_higher_tier_break_takes_precedence() {
        let p = product(r#"{"pricing": {"type": "per_unit", "basePrice": 35, "priceBreaks": [
            {"minQuantity": 10, "maxQuantity": 49, "pricePerUnit": 30},
            {"minQuantity": 50, "maxQuantity": null, "pricePerUnit": 25}]}}"#);
        let s = price(&p, &Selections::with_quantity(60));
        assert_eq!(s.price_per_unit, Decimal::new(25, 0));
        assert_eq!(s.base, Decimal::new(1500, 0));
    }

    #[test]
    fn test_quantity_is_clamped() {
        for raw in [0, -5] {
            let s = price(&flyer(), &Selections::with_quantity(raw));
            assert_eq!(s.quantity.value(), 1);
            assert_eq!(s.total, Decimal::new(35, 0));
        }
        let s = price(&flyer(), &selections(r#"{"quantity": "several"}"#));
        assert_eq!(s.quantity.value(), 1);
    }

    #[test]
    fn test_material_costed_by_area() {
        let p = product(r#"{"pricing": {"type": "fixed", "basePrice": 0}}"#);
        let ctx = PriceCalculationContext {
            material: Some(Material { unit: "m2".into(), cost_per_unit: Decimal::new(20, 0), ..Material::default() }),
            ..PriceCalculationContext::default()
        };
        let s = calculate(&p, &selections(r#"{"dimension": {"width": 500, "height": 500, "unit": "mm"}}"#), &ctx);
        assert_eq!(s.area, Some(Decimal::new(25, 2)));
        assert_eq!(s.material_cost, Decimal::new(5, 0));
        assert_eq!(s.breakdown.material_multiplier, Decimal::new(25, 2));
        assert_eq!(s.breakdown.area_in_square_meters, s.area);
    }

    #[test]
    fn test_dimension_unit_defaults_to_product_unit() {
        let p = product(r#"{"pricing": {"type": "per_sqm", "basePrice": 40}, "dimensions": {"unit": "cm"}}"#);
        let s = price(&p, &selections(r#"{"dimension": {"width": 50, "height": 50}}"#));
        assert_eq!(s.area, Some(Decimal::new(25, 2)));
        assert_eq!(s.base, Decimal::new(10, 0));
    }

    #[test]
    fn test_per_sqm_without_area_prices_one_square_metre() {
        let p = product(r#"{"pricing": {"type": "per_sqm", "basePrice": 40}}"#);
        let s = price(&p, &Selections::with_quantity(3));
        assert_eq!(s.area, None);
        assert_eq!(s.base, Decimal::new(40, 0));
    }

    #[test]
    fn test_fixed_ignores_quantity() {
        let p = product(r#"{"pricing": {"type": "fixed", "basePrice": 49.9}}"#);
        let s = price(&p, &Selections::with_quantity(7));
        assert_eq!(s.base, Decimal::new(499, 1));
        assert_eq!(s.price_per_unit, Decimal::new(713, 2));
    }

    // Weight pricing has no weight field; the quantity stands in for it.
    #[test]
    fn test_per_weight_uses_quantity_as_weight() {
        let p = product(r#"{"pricing": {"type": "per_weight", "basePrice": 2.5}}"#);
        assert_eq!(price(&p, &Selections::with_quantity(12)).base, Decimal::new(30, 0));
    }

    #[test]
    fn test_unknown_pricing_type_uses_unit_base() {
        let p = product(r#"{"pricing": {"type": "per_pallet", "basePrice": 7}}"#);
        let s = price(&p, &Selections::with_quantity(10));
        assert_eq!(s.pricing_type, PricingType::Unknown);
        assert_eq!(s.base, Decimal::new(7, 0));
    }

    #[test]
    fn test_formula_pricing() {
        let p = product(r#"{"pricing": {"type": "formula", "basePrice": 0.2,
            "formula": "BASE * QTY + MATERIAL_COST + FINISH_COST * 2"}}"#);
        let ctx = PriceCalculationContext {
            material: Some(Material { unit: "sheet".into(), cost_per_unit: Decimal::new(10, 2), ..Material::default() }),
            finishing: vec![Finishing { cost_fix: Some(Decimal::new(5, 0)), ..Finishing::default() }],
            ..PriceCalculationContext::default()
        };
        let s = calculate(&p, &Selections::with_quantity(100), &ctx);
        assert_eq!(s.material_cost, Decimal::new(10, 0));
        assert_eq!(s.finishing_cost, Decimal::new(5, 0));
        assert_eq!(s.base, Decimal::new(40, 0));
        assert_eq!(s.subtotal, Decimal::new(55, 0));
    }

    #[test]
    fn test_unsafe_formula_falls_back() {
        let p = product(r#"{"pricing": {"type": "formula", "basePrice": 10, "formula": "BASE*QTY+alert(1)"}}"#);
        assert_eq!(price(&p, &Selections::with_quantity(3)).base, Decimal::new(30, 0));
        let p = product(r#"{"pricing": {"type": "formula", "basePrice": 10, "formula": "BASE / (QTY - QTY)"}}"#);
        assert_eq!(price(&p, &Selections::with_quantity(3)).base, Decimal::new(30, 0));
        let p = product(r#"{"pricing": {"type": "formula", "basePrice": 10}}"#);
        assert_eq!(price(&p, &Selections::with_quantity(3)).base, Decimal::new(30, 0));
    }

    #[test]
    fn test_lowercase_formula_variables() {
        let p = product(r#"{"pricing": {"type": "formula", "basePrice": 10, "formula": "base * qty + 5"}}"#);
        assert_eq!(price(&p, &Selections::with_quantity(3)).base, Decimal::new(35, 0));
    }

    #[test]
    fn test_out_of_range_amounts_saturate() {
        let p = product(r#"{"pricing": {"type": "per_unit", "basePrice": 1e22}}"#);
        let s = price(&p, &Selections::with_quantity(100_000_000));
        assert_eq!(s.base, Decimal::MAX);
        assert_eq!(s.subtotal, Decimal::MAX);
        assert_eq!(s.total, Decimal::MAX);
        assert_eq!(s.price_per_unit, round_money(Decimal::MAX / Decimal::from(100_000_000u32)));

        let p = product(r#"{"pricing": {"type": "per_sqm", "basePrice": 1e22, "discounts": [{"type": "fixed", "value": 1000}]}}"#);
        let s = price(&p, &selections(r#"{"dimension": {"width": 1e20, "height": 1e20, "unit": "m"}}"#));
        assert_eq!(s.base, Decimal::MAX);
        assert_eq!(s.area, Some(Decimal::MAX));
        assert_eq!(s.total, Decimal::MAX - Decimal::new(1000, 0));
    }

    #[test]
    fn test_sequential_percentage_discounts() {
        let p = product(r#"{"pricing": {"type": "fixed", "basePrice": 100, "discounts": [
            {"type": "percentage", "value": 10}, {"type": "percentage", "value": 10}]}}"#);
        let s = price(&p, &Selections::with_quantity(1));
        assert_eq!(s.discounts, Decimal::new(19, 0));
        assert_eq!(s.total, Decimal::new(81, 0));
    }

    #[test]
    fn test_discount_minimum_quantity() {
        let p = product(r#"{"pricing": {"type": "per_unit", "basePrice": 2, "discounts": [
            {"type": "percentage", "value": 25, "minQuantity": 100}]}}"#);
        assert_eq!(price(&p, &Selections::with_quantity(99)).discounts, Decimal::ZERO);
        let s = price(&p, &Selections::with_quantity(100));
        assert_eq!(s.discounts, Decimal::new(50, 0));
        assert_eq!(s.total, Decimal::new(150, 0));
        assert_eq!(s.price_per_unit, Decimal::new(150, 2));
    }

    #[test]
    fn test_total_never_negative() {
        let p = product(r#"{"pricing": {"type": "fixed", "basePrice": 50, "discounts": [{"type": "fixed", "value": 80}]}}"#);
        let s = price(&p, &Selections::with_quantity(4));
        assert_eq!(s.discounts, Decimal::new(80, 0));
        assert_eq!(s.total, Decimal::ZERO);
        assert_eq!(s.price_per_unit, Decimal::ZERO);
    }

    #[test]
    fn test_options_and_rule_adjustment() {
        let p = product(r#"{"pricing": {"type": "fixed", "basePrice": 20}, "options": [
            {"id": "extras", "type": "checkbox", "values": [{"value": "a", "priceModifier": 5}, {"value": "b", "priceModifier": 3}]}]}"#);
        let ctx = PriceCalculationContext { option_price_adjustments: Some(Decimal::new(25, 1)), ..PriceCalculationContext::default() };
        let s = calculate(&p, &selections(r#"{"options": {"extras": ["a", "b"]}}"#), &ctx);
        assert_eq!(s.breakdown.option_value_cost, Decimal::new(8, 0));
        assert_eq!(s.breakdown.rule_adjustment, Decimal::new(25, 1));
        assert_eq!(s.option_cost, Decimal::new(105, 1));
        assert_eq!(s.total, Decimal::new(305, 1));
    }

    #[test]
    fn test_subtotal_identity_and_idempotence() {
        let p = product(r#"{"pricing": {"type": "per_unit", "basePrice": 0.333,
            "discounts": [{"type": "percentage", "value": 7.5}, {"type": "fixed", "value": 1.111}]}}"#);
        let ctx = PriceCalculationContext {
            material: Some(Material { unit: "sqm".into(), cost_per_unit: Decimal::new(1899, 2), ..Material::default() }),
            print_method: Some(PrintMethod { cost_per_m2: Some(Decimal::new(333, 2)), cost_per_sheet: Some(Decimal::new(7, 3)), ..PrintMethod::default() }),
            finishing: vec![Finishing { cost_per_unit: Some(Decimal::new(13, 3)), ..Finishing::default() }],
            option_price_adjustments: None,
        };
        let s = selections(r#"{"quantity": 37, "dimension": {"width": 333, "height": 127, "unit": "mm"}}"#);
        let first = calculate(&p, &s, &ctx);
        let second = calculate(&p, &s, &ctx);
        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
        assert_eq!(
            first.subtotal,
            round_money(first.base + first.material_cost + first.print_cost + first.finishing_cost + first.option_cost)
        );
        assert_eq!(first.total, (first.subtotal - first.discounts).max(Decimal::ZERO));
        for money in [first.base, first.material_cost, first.print_cost, first.finishing_cost, first.discounts, first.total, first.price_per_unit] {
            assert_eq!(money, round_money(money));
        }
    }

    #[test]
    fn test_summary_json_shape() {
        let json = serde_json::to_value(price(&flyer(), &Selections::with_quantity(20))).unwrap();
        assert_eq!(json["total"].as_f64(), Some(600.0));
        assert_eq!(json["pricePerUnit"].as_f64(), Some(30.0));
        assert_eq!(json["pricingType"], "per_unit");
        assert_eq!(json["quantity"], 20);
        assert_eq!(json["appliedPriceBreak"]["minQuantity"], 10);
        assert!(json["breakdown"]["optionValueCost"].is_number());
        assert!(json.get("area").is_none());
    }
}
