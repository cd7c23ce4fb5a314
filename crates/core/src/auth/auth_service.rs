//! Bearer-token validation service implementation.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::sync::Arc;

use super::auth_errors::AuthError;
use super::auth_model::AuthenticatedUser;
use super::auth_traits::TokenAuthServiceTrait;
use crate::errors::{Error, Result};
use crate::store::{RawRecord, TokenGateway};

/// Service validating bearer tokens against the token collection.
pub struct TokenAuthService {
    tokens: Arc<dyn TokenGateway>,
}

impl TokenAuthService {
    /// Creates a new TokenAuthService instance.
    pub fn new(tokens: Arc<dyn TokenGateway>) -> Self {
        Self { tokens }
    }

    /// Reads the identity out of a token document. The document id doubles
    /// as the user reference; a malformed document reads as no identity.
    fn parse_token_document(doc: &RawRecord) -> Option<AuthenticatedUser> {
        let user_name = doc.get("UserName")?.as_str()?.to_string();
        let user_id = match doc.get("_id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Object(obj)) => obj.get("$oid")?.as_str()?.to_string(),
            _ => user_name.clone(),
        };

        Some(AuthenticatedUser { user_id, user_name })
    }
}

#[async_trait]
impl TokenAuthServiceTrait for TokenAuthService {
    async fn validate_bearer_token(&self, bearer_token: &str) -> Result<AuthenticatedUser> {
        if bearer_token.trim().is_empty() {
            return Err(Error::Auth(AuthError::MissingToken));
        }

        let doc = self.tokens.find_token(bearer_token).await?;
        let user = doc
            .as_ref()
            .and_then(Self::parse_token_document)
            .ok_or(Error::Auth(AuthError::InvalidToken))?;

        // The last-use stamp is bookkeeping; a failed stamp must not
        // un-authenticate a valid token.
        if let Err(err) = self.tokens.touch_token(bearer_token).await {
            warn!("Failed to stamp last use for a valid token: {}", err);
        }

        debug!("Bearer token validated for user {}", user.user_name);
        Ok(user)
    }

    async fn authorize_for_user(
        &self,
        bearer_token: &str,
        user_identifier: &str,
    ) -> Result<AuthenticatedUser> {
        let user = self.validate_bearer_token(bearer_token).await?;
        if !user.matches_identifier(user_identifier) {
            warn!(
                "Token for user {} presented against identifier {}",
                user.user_name, user_identifier
            );
            return Err(Error::Auth(AuthError::UserMismatch));
        }
        Ok(user)
    }
}
