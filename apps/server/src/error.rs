use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use openfinance_core::auth::AuthError;
use openfinance_core::errors::Error as CoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Wrapper turning core errors into HTTP responses.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CoreError);

/// A degraded aggregation is a 200 with `partial: true`; only errors the
/// aggregator refuses to absorb land here.
fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InternalSourceUnavailable(_) => StatusCode::BAD_GATEWAY,
        CoreError::CurrencyMismatch { .. } => StatusCode::CONFLICT,
        CoreError::Auth(AuthError::MissingToken) => StatusCode::BAD_REQUEST,
        CoreError::Auth(_) => StatusCode::FORBIDDEN,
        CoreError::Normalize(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Store(_) | CoreError::Cancelled | CoreError::Unexpected(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, message);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
