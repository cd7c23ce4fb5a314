//! Aggregation module - multi-source record merging.

mod aggregation_model;
mod aggregation_service;
mod aggregation_traits;

// Re-export the public interface
pub use aggregation_model::{AggregationResult, SourceScope};
pub use aggregation_service::AggregationService;
pub use aggregation_traits::AggregationServiceTrait;
