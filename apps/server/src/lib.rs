//! Openfinance Server - HTTP facade over the aggregation engine.
//!
//! Exposes the multi-source account and product listings, the balance
//! and debt summaries, bearer-token validation and the link simulation
//! endpoints over an in-memory store.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
