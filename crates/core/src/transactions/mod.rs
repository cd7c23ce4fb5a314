//! Transactions module - canonical ledger transaction records.

mod transactions_model;
mod transactions_service;
mod transactions_traits;

// Re-export the public interface
pub use transactions_model::{Transaction, TransactionListing};
pub use transactions_service::TransactionService;
pub use transactions_traits::TransactionServiceTrait;
