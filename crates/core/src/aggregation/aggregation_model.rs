//! Aggregation result models.

use serde::{Deserialize, Serialize};

/// Which sources an aggregation draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceScope {
    /// The internal ledger plus every linked external institution.
    All,
    /// Linked external institutions only. The ledger is not queried, so a
    /// ledger outage cannot fail a listing under this scope.
    ExternalOnly,
}

/// A merged multi-source listing with its completeness annotations.
///
/// `partial` is true whenever at least one external source could not
/// contribute; the institutions that failed are listed so a caller can
/// tell the user exactly what is missing. A partial result is degraded,
/// never silently presented as exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult<T> {
    /// Ordered, deduplicated records: internal first, then external
    /// groups in institution query order.
    pub records: Vec<T>,
    /// Institution ids that answered, in query order.
    pub contributing_sources: Vec<String>,
    /// External institutions that were unreachable.
    pub failed_sources: Vec<String>,
    /// Malformed documents dropped during normalization.
    pub dropped_records: usize,
    pub partial: bool,
}

impl<T> AggregationResult<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            contributing_sources: Vec::new(),
            failed_sources: Vec::new(),
            dropped_records: 0,
            partial: false,
        }
    }
}
