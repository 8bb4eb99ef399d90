//! Catalog entities referenced by selections: materials, print methods and
//! finishing operations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit markers that switch material costing from per-piece to per-square-metre.
const AREA_UNIT_MARKERS: [&str; 3] = ["m2", "sqm", "mp"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub cost_per_unit: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<Decimal>,
}

impl Material {
    /// Substring match on the unit, so "m2", "SQM", "lei/mp" all count.
    pub fn is_area_based(&self) -> bool {
        let unit = self.unit.to_ascii_lowercase();
        AREA_UNIT_MARKERS.iter().any(|m| unit.contains(m))
    }

    pub fn unit_cost(&self) -> Decimal { self.cost_per_unit.saturating_add(self.price_modifier.unwrap_or_default()) }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintMethod {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_m2: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_sheet: Option<Decimal>,
}

/// Post-processing step such as lamination or cutting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finishing {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_fix: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_m2: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_modifier: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(unit: &str) -> Material { Material { unit: unit.into(), ..Material::default() } }

    #[test]
    fn test_area_based_units() {
        assert!(material("m2").is_area_based());
        assert!(material("SQM").is_area_based());
        assert!(material("lei/mp").is_area_based());
        assert!(!material("sheet").is_area_based());
        assert!(!material("").is_area_based());
    }

    #[test]
    fn test_unit_cost_includes_modifier() {
        let m = Material { cost_per_unit: Decimal::new(20, 0), price_modifier: Some(Decimal::new(-5, 1)), ..material("m2") };
        assert_eq!(m.unit_cost(), Decimal::new(195, 1));
    }
}
