//! Aggregates module
pub mod product;
pub mod selection;

pub use product::{Discount, DiscountKind, OptionKind, OptionValue, PriceBreak, PricingStrategy, PricingType, Product, ProductDimensions, ProductOption};
pub use selection::{DimensionSelection, OptionSelection, Selections};
