//! Store gateway error types.

use thiserror::Error;

/// Errors surfaced by the record store gateways.
///
/// Each variant answers one question for the caller: is the source worth
/// asking again? `Unavailable` is transient (unreachable store, timed-out
/// call); `Query` means the request itself was rejected and a retry would
/// fail the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The source could not be reached or did not answer in time.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query (malformed filter, unknown collection).
    #[error("Store query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// True when the failure is transient and the source may answer later.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
