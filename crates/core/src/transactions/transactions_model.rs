//! Ledger transaction domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical ledger transaction, normalized from a raw store document.
///
/// Transactions only exist on the internal ledger; external institutions
/// expose balances, not movement history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub account_number: String,
    pub amount: Decimal,
    pub currency: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// A normalized transaction listing with its drop count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListing {
    pub transactions: Vec<Transaction>,
    /// Malformed documents dropped during normalization.
    pub dropped_records: usize,
}
