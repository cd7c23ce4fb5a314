//! Adapter module - normalizes raw store documents into canonical records.

mod adapter_errors;
mod adapter_service;
mod field_map;

// Re-export the public interface
pub use adapter_errors::NormalizeError;
pub use adapter_service::{
    normalize_account, normalize_account_batch, normalize_product, normalize_product_batch,
    normalize_transaction, normalize_transaction_batch,
};
pub use field_map::{AccountFieldMap, ProductFieldMap, TransactionFieldMap};
