//! Print-shop pricing engine
//!
//! Prices configurable print products from a customer's selections.
//!
//! ## Features
//! - Quantity price breaks
//! - Fixed, per-unit, per-m², per-weight and formula pricing
//! - Material, print, finishing and option costing
//! - Sequential discounts
//! - Catalog-backed quoting over HTTP

pub mod api;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod pricing;

pub use catalog::{Catalog, OptionRule};
pub use domain::aggregates::{Product, Selections};
pub use pricing::{calculate, PriceCalculationContext, PriceSummary};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Catalog read error: {0}")]
    CatalogIo(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PricingError>;
