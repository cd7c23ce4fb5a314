//! Per-source field tables.
//!
//! Each source kind stores documents in its own vocabulary. These tables
//! are the only place that vocabulary is written down; normalization walks
//! them, so teaching the system a new source kind means adding an entry
//! here, not editing mapping code. Paths are segment lists into nested
//! documents.

use crate::store::SourceKind;

/// Field paths for account documents.
#[derive(Debug)]
pub struct AccountFieldMap {
    pub id: &'static [&'static str],
    pub owner_id: &'static [&'static str],
    pub owner_name: &'static [&'static str],
    pub institution: &'static [&'static str],
    pub currency: &'static [&'static str],
    pub balance: &'static [&'static str],
    pub category: &'static [&'static str],
    pub status: &'static [&'static str],
    pub as_of: &'static [&'static str],
}

/// Ledger accounts are keyed by their account number.
const INTERNAL_ACCOUNT_FIELDS: AccountFieldMap = AccountFieldMap {
    id: &["AccountNumber"],
    owner_id: &["AccountUser", "UserId"],
    owner_name: &["AccountUser", "UserName"],
    institution: &["AccountBank"],
    currency: &["AccountCurrency"],
    balance: &["AccountBalance"],
    category: &["AccountType"],
    status: &["AccountStatus"],
    as_of: &["AccountDate", "OpeningDate"],
};

/// External accounts are keyed by the store document id; institutions
/// reuse the same nesting but add their own narrative fields, which the
/// table simply does not mention.
const EXTERNAL_ACCOUNT_FIELDS: AccountFieldMap = AccountFieldMap {
    id: &["_id"],
    owner_id: &["AccountUser", "UserId"],
    owner_name: &["AccountUser", "UserName"],
    institution: &["AccountBank"],
    currency: &["AccountCurrency"],
    balance: &["AccountBalance"],
    category: &["AccountType"],
    status: &["AccountStatus"],
    as_of: &["AccountDate", "OpeningDate"],
};

impl AccountFieldMap {
    pub fn for_source(source: SourceKind) -> &'static AccountFieldMap {
        match source {
            SourceKind::Internal => &INTERNAL_ACCOUNT_FIELDS,
            SourceKind::External => &EXTERNAL_ACCOUNT_FIELDS,
        }
    }
}

/// Field paths for financial product documents.
#[derive(Debug)]
pub struct ProductFieldMap {
    pub id: &'static [&'static str],
    pub owner_id: &'static [&'static str],
    pub owner_name: &'static [&'static str],
    pub institution: &'static [&'static str],
    pub currency: &'static [&'static str],
    pub amount: &'static [&'static str],
    pub product_type: &'static [&'static str],
    pub interest_rate: &'static [&'static str],
    pub as_of: &'static [&'static str],
}

const INTERNAL_PRODUCT_FIELDS: ProductFieldMap = ProductFieldMap {
    id: &["ProductId"],
    owner_id: &["ProductCustomer", "UserId"],
    owner_name: &["ProductCustomer", "UserName"],
    institution: &["ProductBank"],
    currency: &["ProductCurrency"],
    amount: &["ProductAmount"],
    product_type: &["ProductType"],
    interest_rate: &["ProductInterestRate"],
    as_of: &["ProductDate", "OpeningDate"],
};

const EXTERNAL_PRODUCT_FIELDS: ProductFieldMap = ProductFieldMap {
    id: &["_id"],
    owner_id: &["ProductCustomer", "UserId"],
    owner_name: &["ProductCustomer", "UserName"],
    institution: &["ProductBank"],
    currency: &["ProductCurrency"],
    amount: &["ProductAmount"],
    product_type: &["ProductType"],
    interest_rate: &["ProductInterestRate"],
    as_of: &["ProductDate", "OpeningDate"],
};

impl ProductFieldMap {
    pub fn for_source(source: SourceKind) -> &'static ProductFieldMap {
        match source {
            SourceKind::Internal => &INTERNAL_PRODUCT_FIELDS,
            SourceKind::External => &EXTERNAL_PRODUCT_FIELDS,
        }
    }
}

/// Field paths for ledger transaction documents. Transactions only exist
/// on the internal ledger, so there is a single table.
#[derive(Debug)]
pub struct TransactionFieldMap {
    pub id: &'static [&'static str],
    pub account_number: &'static [&'static str],
    pub fallback_account_number: &'static [&'static str],
    pub amount: &'static [&'static str],
    pub currency: &'static [&'static str],
    pub posted_at: &'static [&'static str],
    pub description: &'static [&'static str],
}

const LEDGER_TRANSACTION_FIELDS: TransactionFieldMap = TransactionFieldMap {
    id: &["_id"],
    account_number: &["TransactionReferences", "OriginAccountNumber"],
    fallback_account_number: &["AccountNumber"],
    amount: &["TransactionAmount"],
    currency: &["TransactionCurrency"],
    posted_at: &["TransactionDates", "TransactionDate"],
    description: &["TransactionDescription"],
};

impl TransactionFieldMap {
    pub fn ledger() -> &'static TransactionFieldMap {
        &LEDGER_TRANSACTION_FIELDS
    }
}
