//! Customer selections for one prospective order line

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::value_objects::{lenient_quantity, Quantity};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selections {
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<DimensionSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_method_id: Option<String>,
    #[serde(default)]
    pub finishing_ids: Vec<String>,
    #[serde(default)]
    pub options: HashMap<String, OptionSelection>,
}

fn default_quantity() -> i64 { 1 }

impl Selections {
    pub fn with_quantity(quantity: i64) -> Self { Self { quantity, ..Self::default() } }
    pub fn normalized_quantity(&self) -> Quantity { Quantity::clamped(self.quantity) }
    pub fn option(&self, id: &str) -> Option<&OptionSelection> { self.options.get(id) }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionSelection {
    #[serde(default)]
    pub width: Option<Decimal>,
    #[serde(default)]
    pub height: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A single chosen value, or several for checkbox options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionSelection {
    Single(String),
    Multiple(Vec<String>),
}

impl OptionSelection {
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Single(v) => v == value,
            Self::Multiple(vs) => vs.iter().any(|v| v == value),
        }
    }
}
