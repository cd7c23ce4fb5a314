//! Authentication error types.

use thiserror::Error;

/// Bearer-token validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Bearer token is missing")]
    MissingToken,

    #[error("Invalid bearer token")]
    InvalidToken,

    #[error("Bearer token does not belong to the requested user")]
    UserMismatch,
}
