//! Account domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::SourceKind;

/// Canonical account record, normalized from a raw store document.
///
/// Accounts from every source collapse into this one shape; only the
/// `source` tag remembers where a record came from. `balance` is signed
/// (overdrawn accounts carry negative balances). A missing or unparseable
/// observation date is kept as `None` rather than a fabricated timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub owner_user_id: String,
    pub institution_id: String,
    pub source: SourceKind,
    /// Account category from the raw document (e.g. 'Checking', 'Savings')
    pub category: Option<String>,
    pub status: Option<String>,
    pub currency: String,
    pub balance: Decimal,
    /// When the balance was last observed, if the source recorded it
    pub as_of: Option<DateTime<Utc>>,
}

impl Account {
    /// Dedup key within an aggregation: the same account seen twice from
    /// the same institution is one account.
    pub fn dedup_key(&self) -> (String, String) {
        (self.account_id.clone(), self.institution_id.clone())
    }
}
