//! Normalization error types.

use thiserror::Error;

/// A raw document could not be normalized into a canonical record.
///
/// Batch normalization drops the offending document and counts the drop;
/// the record never reaches a listing or a summary, so a malformed balance
/// can never show up as a zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },

    #[error("Field '{field}' has an unexpected shape: {detail}")]
    InvalidField { field: String, detail: String },

    #[error("Field '{field}' must not be negative, got {value}")]
    NegativeAmount { field: String, value: String },
}
