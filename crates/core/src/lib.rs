//! Openfinance Core - Domain entities, services, and traits.
//!
//! This crate contains the multi-source aggregation engine: canonical
//! account and product records, the gateway contracts over the record
//! stores, the per-source normalization layer, the aggregator, and the
//! balance/debt summarizer. It is store-agnostic and defines traits that
//! are implemented by the `store-memory` crate.

pub mod accounts;
pub mod adapter;
pub mod aggregation;
pub mod auth;
pub mod constants;
pub mod errors;
pub mod products;
pub mod store;
pub mod summary;
pub mod transactions;

// Re-export common types from the store and aggregation modules
pub use aggregation::*;
pub use store::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
