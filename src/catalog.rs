//! In-memory catalog
//!
//! Holds products and the materials, print methods and finishing operations
//! their selections refer to, and turns a selection's ids into the
//! [`PriceCalculationContext`] the calculator expects. Also carries option
//! combination rules, which add a fixed adjustment when a set of option
//! values is chosen together.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::domain::aggregates::{Product, Selections};
use crate::domain::catalog::{Finishing, Material, PrintMethod};
use crate::pricing::{calculate, PriceCalculationContext, PriceSummary};
use crate::{PricingError, Result};

/// Adjustment applied when every condition (option id -> value) is selected.
///
/// A rule without conditions always applies to its product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRule {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub conditions: BTreeMap<String, String>,
    pub adjustment: Decimal,
}

impl OptionRule {
    pub fn matches(&self, selections: &Selections) -> bool {
        self.conditions
            .iter()
            .all(|(option, value)| selections.option(option).is_some_and(|s| s.contains(value)))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    materials: Vec<Material>,
    #[serde(default)]
    print_methods: Vec<PrintMethod>,
    #[serde(default)]
    finishing: Vec<Finishing>,
    #[serde(default)]
    option_rules: Vec<OptionRule>,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
    materials: HashMap<String, Material>,
    print_methods: HashMap<String, PrintMethod>,
    finishing: HashMap<String, Finishing>,
    option_rules: Vec<OptionRule>,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    /// Parse a catalog document (`products`, `materials`, `printMethods`,
    /// `finishing`, `optionRules`; all optional).
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        doc.products.into_iter().for_each(|p| catalog.add_product(p));
        doc.materials.into_iter().for_each(|m| catalog.add_material(m));
        doc.print_methods.into_iter().for_each(|m| catalog.add_print_method(m));
        doc.finishing.into_iter().for_each(|f| catalog.add_finishing(f));
        doc.option_rules.into_iter().for_each(|r| catalog.add_option_rule(r));
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_json(&std::fs::read_to_string(path)?)?;
        tracing::info!(path = %path.display(), products = catalog.product_count(), materials = catalog.materials.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn add_product(&mut self, product: Product) { self.products.insert(product.id.clone(), product); }
    pub fn add_material(&mut self, material: Material) { self.materials.insert(material.id.clone(), material); }
    pub fn add_print_method(&mut self, method: PrintMethod) { self.print_methods.insert(method.id.clone(), method); }
    pub fn add_finishing(&mut self, finishing: Finishing) { self.finishing.insert(finishing.id.clone(), finishing); }
    pub fn add_option_rule(&mut self, rule: OptionRule) { self.option_rules.push(rule); }

    /// Products ordered by id.
    pub fn products(&self) -> impl Iterator<Item = &Product> { self.products.values() }
    pub fn product(&self, id: &str) -> Option<&Product> { self.products.get(id) }
    pub fn product_count(&self) -> usize { self.products.len() }

    /// Sum of the matching rules for `product_id`, or `None` when the product has no rules.
    pub fn option_adjustment(&self, product_id: &str, selections: &Selections) -> Option<Decimal> {
        let mut rules = self.option_rules.iter().filter(|r| r.product_id == product_id).peekable();
        rules.peek()?;
        Some(rules.filter(|r| r.matches(selections)).map(|r| r.adjustment).fold(Decimal::ZERO, Decimal::saturating_add))
    }

    /// Look up the entities `selections` refers to. Unknown ids are skipped.
    pub fn resolve_context(&self, product: &Product, selections: &Selections) -> PriceCalculationContext {
        let material = selections.material_id.as_deref().and_then(|id| {
            let found = self.materials.get(id).cloned();
            if found.is_none() {
                tracing::debug!(material_id = id, "unknown material, costing without it");
            }
            found
        });
        let print_method = selections.print_method_id.as_deref().and_then(|id| {
            let found = self.print_methods.get(id).cloned();
            if found.is_none() {
                tracing::debug!(print_method_id = id, "unknown print method, costing without it");
            }
            found
        });
        let finishing = selections
            .finishing_ids
            .iter()
            .filter_map(|id| self.finishing.get(id).cloned())
            .collect();
        PriceCalculationContext {
            material,
            print_method,
            finishing,
            option_price_adjustments: self.option_adjustment(&product.id, selections),
        }
    }

    /// Authoritative server-side price for `selections` on `product_id`.
    pub fn quote(&self, product_id: &str, selections: &Selections) -> Result<PriceSummary> {
        let product = self.product(product_id).ok_or_else(|| PricingError::ProductNotFound(product_id.to_string()))?;
        let context = self.resolve_context(product, selections);
        Ok(calculate(product, selections, &context))
    }
}
