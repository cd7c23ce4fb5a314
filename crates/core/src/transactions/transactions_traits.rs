use async_trait::async_trait;

use super::transactions_model::TransactionListing;
use crate::errors::Result;

/// Trait defining the contract for ledger transaction history.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Returns the user's recent ledger transactions, newest first.
    async fn list_recent_transactions(&self, user_id: &str) -> Result<TransactionListing>;
}
