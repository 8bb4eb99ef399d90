//! Calculator input context and itemized output

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{PriceBreak, PricingType};
use crate::domain::catalog::{Finishing, Material, PrintMethod};
use crate::domain::value_objects::Quantity;

/// Catalog entities already resolved from the selection's ids.
///
/// Every field is optional; an absent entity contributes nothing to the price.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_method: Option<PrintMethod>,
    #[serde(default)]
    pub finishing: Vec<Finishing>,
    /// Adjustment from combination rules, added to the option cost as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_price_adjustments: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub base: Decimal,
    pub material_cost: Decimal,
    pub print_cost: Decimal,
    pub finishing_cost: Decimal,
    pub option_cost: Decimal,
    pub discounts: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub price_per_unit: Decimal,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Decimal>,
    pub pricing_type: PricingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_price_break: Option<PriceBreak>,
    pub breakdown: PriceBreakdown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub option_value_cost: Decimal,
    pub rule_adjustment: Decimal,
    pub material_multiplier: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_method: Option<PricingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_break: Option<PriceBreak>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_in_square_meters: Option<Decimal>,
}
