//! Products module - canonical financial product records.

mod products_model;

// Re-export the public interface
pub use products_model::{Product, ProductType};
