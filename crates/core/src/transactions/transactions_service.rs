use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::transactions_model::TransactionListing;
use super::transactions_traits::TransactionServiceTrait;
use crate::adapter::normalize_transaction_batch;
use crate::errors::{Error, Result};
use crate::store::LedgerGateway;

/// Serves transaction history straight from the internal ledger.
///
/// There is no fan-out here: external institutions only hand over balances,
/// so a ledger outage cannot be downgraded to a partial result.
pub struct TransactionService {
    ledger: Arc<dyn LedgerGateway>,
}

impl TransactionService {
    pub fn new(ledger: Arc<dyn LedgerGateway>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn list_recent_transactions(&self, user_id: &str) -> Result<TransactionListing> {
        let raw = self
            .ledger
            .fetch_transactions(user_id)
            .await
            .map_err(|err| {
                if err.is_transient() {
                    Error::InternalSourceUnavailable(err)
                } else {
                    Error::Store(err)
                }
            })?;

        let (mut transactions, dropped_records) = normalize_transaction_batch(&raw);
        transactions.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));

        debug!(
            "Listed {} transactions for user {} ({} dropped)",
            transactions.len(),
            user_id,
            dropped_records
        );

        Ok(TransactionListing {
            transactions,
            dropped_records,
        })
    }
}
