//! Summary service traits.

use super::summary_model::SummaryMetric;
use crate::accounts::Account;
use crate::aggregation::AggregationResult;
use crate::errors::Result;
use crate::products::Product;

/// Contract for reducing aggregated records into summary figures.
///
/// Summaries never convert currencies: a record in a second currency is a
/// hard `CurrencyMismatch`, not a silently skewed figure.
pub trait SummaryServiceTrait: Send + Sync {
    /// Sums account balances into a total-balance metric.
    fn total_balance(&self, aggregation: &AggregationResult<Account>) -> Result<SummaryMetric>;

    /// Sums liability products into a total-debt metric. Investments and
    /// unclassified products are excluded before any currency inspection.
    fn total_debt(&self, aggregation: &AggregationResult<Product>) -> Result<SummaryMetric>;
}
