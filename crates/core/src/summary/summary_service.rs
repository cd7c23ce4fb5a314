//! Summary service implementation.

use log::debug;
use rust_decimal::Decimal;

use super::summary_model::{StaleRecordPolicy, SummaryMetric};
use super::summary_traits::SummaryServiceTrait;
use crate::accounts::Account;
use crate::aggregation::AggregationResult;
use crate::constants::METRIC_DECIMAL_PRECISION;
use crate::errors::{Error, Result};
use crate::products::Product;

/// Service reducing aggregated records into balance and debt figures.
pub struct SummaryService {
    base_currency: String,
    stale_policy: StaleRecordPolicy,
}

impl SummaryService {
    /// Creates a new SummaryService instance.
    pub fn new(base_currency: String, stale_policy: StaleRecordPolicy) -> Self {
        Self {
            base_currency,
            stale_policy,
        }
    }

    /// Strict single-currency sum.
    ///
    /// The first summed record pins the currency; any later record in a
    /// different currency fails the whole summary. Records without an
    /// observation date are counted and, under the exclude policy, left
    /// out before the currency is even looked at.
    fn sum_records<'a, T>(
        &self,
        records: impl Iterator<Item = &'a T>,
        amount_of: impl Fn(&T) -> Decimal,
        currency_of: impl Fn(&T) -> &str,
        id_of: impl Fn(&T) -> &str,
        is_stale: impl Fn(&T) -> bool,
    ) -> Result<(Decimal, String, usize)>
    where
        T: 'a,
    {
        let mut value = Decimal::ZERO;
        let mut currency: Option<String> = None;
        let mut stale_records = 0usize;

        for record in records {
            if is_stale(record) {
                stale_records += 1;
                if self.stale_policy == StaleRecordPolicy::Exclude {
                    debug!(
                        "Excluding record {} with unknown observation date",
                        id_of(record)
                    );
                    continue;
                }
            }

            match &currency {
                None => currency = Some(currency_of(record).to_string()),
                Some(expected) if expected != currency_of(record) => {
                    return Err(Error::CurrencyMismatch {
                        expected: expected.clone(),
                        found: currency_of(record).to_string(),
                        record_id: id_of(record).to_string(),
                    });
                }
                Some(_) => {}
            }

            value += amount_of(record);
        }

        let currency = currency.unwrap_or_else(|| self.base_currency.clone());
        Ok((
            value.round_dp(METRIC_DECIMAL_PRECISION),
            currency,
            stale_records,
        ))
    }
}

impl SummaryServiceTrait for SummaryService {
    fn total_balance(&self, aggregation: &AggregationResult<Account>) -> Result<SummaryMetric> {
        let (value, currency, stale_records) = self.sum_records(
            aggregation.records.iter(),
            |a| a.balance,
            |a| a.currency.as_str(),
            |a| a.account_id.as_str(),
            |a| a.as_of.is_none(),
        )?;

        debug!(
            "Total balance over {} accounts: {} {} (partial: {})",
            aggregation.records.len(),
            value,
            currency,
            aggregation.partial
        );

        Ok(SummaryMetric {
            value,
            currency,
            contributing_sources: aggregation.contributing_sources.clone(),
            partial: aggregation.partial,
            stale_records,
        })
    }

    fn total_debt(&self, aggregation: &AggregationResult<Product>) -> Result<SummaryMetric> {
        let liabilities = aggregation
            .records
            .iter()
            .filter(|p| p.product_type.is_liability());

        let (value, currency, stale_records) = self.sum_records(
            liabilities,
            |p| p.outstanding_balance,
            |p| p.currency.as_str(),
            |p| p.product_id.as_str(),
            |p| p.as_of.is_none(),
        )?;

        debug!(
            "Total debt over {} products: {} {} (partial: {})",
            aggregation.records.len(),
            value,
            currency,
            aggregation.partial
        );

        Ok(SummaryMetric {
            value,
            currency,
            contributing_sources: aggregation.contributing_sources.clone(),
            partial: aggregation.partial,
            stale_records,
        })
    }
}
