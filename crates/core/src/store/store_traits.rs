//! Record store gateway traits.
//!
//! These traits define read access to the backing stores without any
//! store-specific types, allowing for different store implementations.
//! Every call targets exactly one logical source, returns raw documents,
//! and never retries; degradation policy belongs to the callers.

use async_trait::async_trait;

use super::store_errors::StoreError;
use super::store_model::RawRecord;

/// Gateway to the internal ledger, the home institution's own system of
/// record. The ledger is a separate service boundary: when it is down the
/// gateway reports `StoreError::Unavailable` and the caller decides how
/// fatal that is.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Fetches the raw account documents held for a user.
    async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<RawRecord>, StoreError>;

    /// Fetches the raw financial product documents held for a user.
    async fn fetch_products(&self, user_id: &str) -> Result<Vec<RawRecord>, StoreError>;

    /// Fetches recent raw transaction documents for a user, newest first.
    async fn fetch_transactions(&self, user_id: &str) -> Result<Vec<RawRecord>, StoreError>;
}

/// Gateway to the open-finance store holding records synced from connected
/// external institutions.
#[async_trait]
pub trait ExternalRecordGateway: Send + Sync {
    /// Lists the institutions the user has linked, in a stable order.
    ///
    /// Repeated calls over unchanged data must return the same sequence;
    /// aggregation ordering is built on top of it.
    async fn list_institutions(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// Fetches the raw account documents a single institution holds for a
    /// user.
    async fn fetch_accounts(
        &self,
        user_id: &str,
        institution_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError>;

    /// Fetches the raw product documents a single institution holds for a
    /// user.
    async fn fetch_products(
        &self,
        user_id: &str,
        institution_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError>;
}

/// Gateway to the bearer-token collection used by the facade to
/// authenticate callers.
#[async_trait]
pub trait TokenGateway: Send + Sync {
    /// Looks up a token document by its bearer string.
    async fn find_token(&self, bearer_token: &str) -> Result<Option<RawRecord>, StoreError>;

    /// Stamps the token's last-use date.
    async fn touch_token(&self, bearer_token: &str) -> Result<(), StoreError>;
}
