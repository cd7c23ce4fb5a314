//! Raw store documents and source classification.

use serde::{Deserialize, Serialize};

/// A document as returned by a record store, prior to normalization.
///
/// Stores keep records in loosely structured collections; the adapter
/// layer is the only place allowed to interpret their fields.
pub type RawRecord = serde_json::Value;

/// Classifies where a record came from.
///
/// Internal records originate from the home ledger. External records are
/// copies of connected-institution data held in the open-finance store.
/// The two use different document vocabularies, so every canonical record
/// carries its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Internal,
    External,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Internal => "internal",
            SourceKind::External => "external",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
