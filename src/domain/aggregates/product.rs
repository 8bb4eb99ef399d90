//! Product Aggregate
//!
//! A configurable catalog product: its pricing strategy, quantity breaks,
//! discounts and the options a customer can pick from. Read-only input to
//! the price calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Quantity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub pricing: PricingStrategy,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ProductDimensions>,
}

impl Product {
    pub fn option(&self, id: &str) -> Option<&ProductOption> { self.options.iter().find(|o| o.id == id) }
    pub fn dimension_unit(&self) -> Option<&str> { self.dimensions.as_ref().and_then(|d| d.unit.as_deref()) }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingStrategy {
    #[serde(rename = "type", default)]
    pub pricing_type: PricingType,
    #[serde(default)]
    pub base_price: Decimal,
    #[serde(default)]
    pub price_breaks: Vec<PriceBreak>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default)]
    pub discounts: Vec<Discount>,
}

/// How the base price component is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    Fixed,
    PerUnit,
    PerSqm,
    /// Uses the order quantity as the weight.
    PerWeight,
    Formula,
    #[default]
    #[serde(other)]
    Unknown,
}

impl PricingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::PerUnit => "per_unit",
            Self::PerSqm => "per_sqm",
            Self::PerWeight => "per_weight",
            Self::Formula => "formula",
            Self::Unknown => "unknown",
        }
    }
}

/// Quantity tier overriding the per-unit base price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreak {
    pub min_quantity: u32,
    #[serde(default)]
    pub max_quantity: Option<u32>,
    pub price_per_unit: Decimal,
}

impl PriceBreak {
    pub fn covers(&self, quantity: Quantity) -> bool {
        let q = quantity.value();
        q >= self.min_quantity && self.max_quantity.map_or(true, |max| q <= max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(rename = "type", default)]
    pub kind: DiscountKind,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    /// Flat amount. Any type other than `percentage` lands here.
    #[default]
    #[serde(other)]
    Fixed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: OptionKind,
    #[serde(default)]
    pub values: Vec<OptionValue>,
}

impl ProductOption {
    pub fn value(&self, value: &str) -> Option<&OptionValue> { self.values.iter().find(|v| v.value == value) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Dropdown,
    Checkbox,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<Decimal>,
}
