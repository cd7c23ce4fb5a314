//! Financial product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::SourceKind;

/// Classification of a financial product.
///
/// Loans, mortgages and credit lines are liabilities and feed the debt
/// summary. Investments and unrecognized products never do; an unknown
/// type string from a source maps to `Other` instead of failing the
/// record, so a new product kind can flow through listings before the
/// mapping learns about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductType {
    Loan,
    Mortgage,
    CreditLine,
    Investment,
    Other,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Loan => "Loan",
            ProductType::Mortgage => "Mortgage",
            ProductType::CreditLine => "CreditLine",
            ProductType::Investment => "Investment",
            ProductType::Other => "Other",
        }
    }

    /// Maps a raw type string onto a product type, case-insensitively.
    /// Unknown strings map to `Other`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "loan" => ProductType::Loan,
            "mortgage" => ProductType::Mortgage,
            "creditline" | "credit_line" | "credit line" => ProductType::CreditLine,
            "investment" => ProductType::Investment,
            _ => ProductType::Other,
        }
    }

    /// True for product types that represent money owed.
    pub fn is_liability(&self) -> bool {
        matches!(
            self,
            ProductType::Loan | ProductType::Mortgage | ProductType::CreditLine
        )
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical financial product record, normalized from a raw store
/// document.
///
/// `outstanding_balance` is how much of the product is currently owed or
/// held and is never negative; a source reporting a negative amount is
/// treated as malformed upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub owner_user_id: String,
    pub institution_id: String,
    pub source: SourceKind,
    pub product_type: ProductType,
    pub outstanding_balance: Decimal,
    pub currency: String,
    pub interest_rate: Option<Decimal>,
    /// When the balance was last observed, if the source recorded it
    pub as_of: Option<DateTime<Utc>>,
}

impl Product {
    /// Dedup key within an aggregation: the same product seen twice from
    /// the same institution is one product.
    pub fn dedup_key(&self) -> (String, String) {
        (self.product_id.clone(), self.institution_id.clone())
    }
}
