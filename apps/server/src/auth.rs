use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use openfinance_core::auth::{AuthError, AuthenticatedUser};
use openfinance_core::errors::Error as CoreError;

use crate::error::ApiError;
use crate::main_lib::AppState;

/// Extractor for routes requiring a valid bearer token.
///
/// A missing or non-bearer `Authorization` header is a 400; an unknown
/// token is a 403. Whether the authenticated user may act on the
/// requested user is checked per handler, where the target user is known.
pub struct RequireUser(pub AuthenticatedUser);

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user = state.auth_service.validate_bearer_token(&token).await?;
        Ok(RequireUser(user))
    }
}

/// Checks that the authenticated user is the one the request targets.
pub fn ensure_user_scope(user: &AuthenticatedUser, identifier: &str) -> Result<(), ApiError> {
    if !user.matches_identifier(identifier) {
        return Err(CoreError::Auth(AuthError::UserMismatch).into());
    }
    Ok(())
}

fn bearer_token(parts: &Parts) -> Result<String, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let token = header.strip_prefix("Bearer ").map(str::trim).unwrap_or("");
    if token.is_empty() {
        return Err(CoreError::Auth(AuthError::MissingToken).into());
    }
    Ok(token.to_string())
}
