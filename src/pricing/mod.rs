//! Pricing engine
pub mod breaks;
pub mod calculator;
pub mod costs;
pub mod discounts;
pub mod formula;
pub mod summary;

pub use calculator::calculate;
pub use formula::{FormulaError, FormulaVariables};
pub use summary::{PriceBreakdown, PriceCalculationContext, PriceSummary};
