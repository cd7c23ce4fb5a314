//! Summary metric models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the summarizer treats records whose observation date is unknown.
///
/// The count of affected records is surfaced either way; the policy only
/// decides whether they are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleRecordPolicy {
    /// Sum them and report how many there were.
    #[default]
    Include,
    /// Leave them out of the sum entirely.
    Exclude,
}

impl FromStr for StaleRecordPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "include" => Ok(StaleRecordPolicy::Include),
            "exclude" => Ok(StaleRecordPolicy::Exclude),
            other => Err(format!("Unknown stale record policy: {}", other)),
        }
    }
}

/// A single summarized figure over an aggregated record set.
///
/// `partial` carries through from the aggregation unchanged: a figure
/// computed while an institution was unreachable stays marked degraded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetric {
    pub value: Decimal,
    pub currency: String,
    /// Institution ids whose records fed the figure.
    pub contributing_sources: Vec<String>,
    pub partial: bool,
    /// Records with an unknown observation date that the policy saw.
    pub stale_records: usize,
}
