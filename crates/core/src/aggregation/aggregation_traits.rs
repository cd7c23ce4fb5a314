//! Aggregation service traits.

use async_trait::async_trait;

use super::aggregation_model::{AggregationResult, SourceScope};
use crate::accounts::Account;
use crate::errors::Result;
use crate::products::Product;

/// Contract for merging records across the internal ledger and linked
/// external institutions.
///
/// An `institution_id` filter narrows the aggregation to one source: the
/// internal ledger when it names the home institution, otherwise that
/// external institution. Without a filter the scope decides the source
/// set.
#[async_trait]
pub trait AggregationServiceTrait: Send + Sync {
    /// Aggregates account records for a user.
    async fn list_accounts_for_user(
        &self,
        user_id: &str,
        institution_id: Option<&str>,
        scope: SourceScope,
    ) -> Result<AggregationResult<Account>>;

    /// Aggregates financial product records for a user.
    async fn list_products_for_user(
        &self,
        user_id: &str,
        institution_id: Option<&str>,
        scope: SourceScope,
    ) -> Result<AggregationResult<Product>>;
}
