//! Pricing domain model
pub mod aggregates;
pub mod catalog;
pub mod value_objects;
