//! Summary module - balance and debt metrics over aggregated records.

mod summary_model;
mod summary_service;
mod summary_traits;

// Re-export the public interface
pub use summary_model::{StaleRecordPolicy, SummaryMetric};
pub use summary_service::SummaryService;
pub use summary_traits::SummaryServiceTrait;
