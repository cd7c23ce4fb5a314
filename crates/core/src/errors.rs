//! Core error types for the aggregation engine.
//!
//! This module defines store-agnostic error types. Store-specific failures
//! are converted into these types at the gateway boundary so the services
//! never see a concrete store.

use thiserror::Error;

use crate::adapter::NormalizeError;
use crate::auth::AuthError;
use crate::store::StoreError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the aggregation engine.
///
/// This enum represents all possible errors that can occur while
/// aggregating and summarizing records. Gateway failures are wrapped with
/// their transient/permanent split intact so callers can decide whether a
/// degraded result is acceptable.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Internal source unavailable: {0}")]
    InternalSourceUnavailable(StoreError),

    #[error("Record normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Currency mismatch: summary currency {expected}, record {record_id} has {found}")]
    CurrencyMismatch {
        expected: String,
        found: String,
        record_id: String,
    },

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
