//! Unit tests for the token auth service.

use super::*;
use crate::errors::Error;
use crate::store::{RawRecord, StoreError, TokenGateway};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Mock Implementations
// ============================================================================

struct MockTokenGateway {
    tokens: Vec<RawRecord>,
    touch_count: AtomicUsize,
    touch_fails: bool,
}

impl MockTokenGateway {
    fn new(tokens: Vec<RawRecord>) -> Self {
        Self {
            tokens,
            touch_count: AtomicUsize::new(0),
            touch_fails: false,
        }
    }
}

#[async_trait]
impl TokenGateway for MockTokenGateway {
    async fn find_token(
        &self,
        bearer_token: &str,
    ) -> std::result::Result<Option<RawRecord>, StoreError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.get("BearerToken").and_then(|v| v.as_str()) == Some(bearer_token))
            .cloned())
    }

    async fn touch_token(&self, _bearer_token: &str) -> std::result::Result<(), StoreError> {
        if self.touch_fails {
            return Err(StoreError::Unavailable("token store offline".to_string()));
        }
        self.touch_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn token_doc(user_id: &str, user_name: &str, bearer: &str) -> RawRecord {
    json!({
        "_id": user_id,
        "UserName": user_name,
        "BearerToken": bearer,
        "TokenDates": {
            "CreationDate": "2024-01-01T00:00:00Z",
            "LastUseDate": "2024-01-01T00:00:00Z"
        }
    })
}

fn create_auth_service(gateway: MockTokenGateway) -> (TokenAuthService, Arc<MockTokenGateway>) {
    let gateway = Arc::new(gateway);
    (TokenAuthService::new(gateway.clone()), gateway)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_valid_token_resolves_user_and_stamps_last_use() {
    let (service, gateway) = create_auth_service(MockTokenGateway::new(vec![token_doc(
        "user-1", "ada", "tok-123",
    )]));

    let user = service.validate_bearer_token("tok-123").await.unwrap();
    assert_eq!(user.user_id, "user-1");
    assert_eq!(user.user_name, "ada");
    assert_eq!(gateway.touch_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_token_is_missing() {
    let (service, _) = create_auth_service(MockTokenGateway::new(vec![]));

    let err = service.validate_bearer_token("  ").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::MissingToken)));
}

#[tokio::test]
async fn test_unknown_token_is_invalid() {
    let (service, _) = create_auth_service(MockTokenGateway::new(vec![token_doc(
        "user-1", "ada", "tok-123",
    )]));

    let err = service.validate_bearer_token("tok-999").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::InvalidToken)));
}

#[tokio::test]
async fn test_failed_last_use_stamp_does_not_invalidate() {
    let mut gateway = MockTokenGateway::new(vec![token_doc("user-1", "ada", "tok-123")]);
    gateway.touch_fails = true;
    let (service, _) = create_auth_service(gateway);

    let user = service.validate_bearer_token("tok-123").await.unwrap();
    assert_eq!(user.user_name, "ada");
}

#[tokio::test]
async fn test_authorize_accepts_id_or_name() {
    let (service, _) = create_auth_service(MockTokenGateway::new(vec![token_doc(
        "user-1", "ada", "tok-123",
    )]));

    assert!(service.authorize_for_user("tok-123", "user-1").await.is_ok());
    assert!(service.authorize_for_user("tok-123", "ada").await.is_ok());
}

#[tokio::test]
async fn test_authorize_rejects_other_users() {
    let (service, _) = create_auth_service(MockTokenGateway::new(vec![token_doc(
        "user-1", "ada", "tok-123",
    )]));

    let err = service
        .authorize_for_user("tok-123", "someone-else")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::UserMismatch)));
}

#[tokio::test]
async fn test_object_id_wrapped_user_id() {
    let mut doc = token_doc("ignored", "ada", "tok-123");
    doc["_id"] = json!({ "$oid": "64f0d3d3d3d3d3d3d3d3d303" });
    let (service, _) = create_auth_service(MockTokenGateway::new(vec![doc]));

    let user = service.validate_bearer_token("tok-123").await.unwrap();
    assert_eq!(user.user_id, "64f0d3d3d3d3d3d3d3d3d303");
}
