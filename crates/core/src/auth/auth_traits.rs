//! Authentication service traits.

use async_trait::async_trait;

use super::auth_model::AuthenticatedUser;
use crate::errors::Result;

/// Contract for validating bearer tokens.
///
/// Token issuance lives elsewhere; this service only answers whether a
/// presented token is known and whom it belongs to.
#[async_trait]
pub trait TokenAuthServiceTrait: Send + Sync {
    /// Validates a bearer token and stamps its last use.
    async fn validate_bearer_token(&self, bearer_token: &str) -> Result<AuthenticatedUser>;

    /// Validates the token and checks it belongs to the identified user.
    async fn authorize_for_user(
        &self,
        bearer_token: &str,
        user_identifier: &str,
    ) -> Result<AuthenticatedUser>;
}
