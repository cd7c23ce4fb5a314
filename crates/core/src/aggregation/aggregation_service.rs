//! Multi-source aggregation service implementation.

use async_trait::async_trait;
use futures::future;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::aggregation_model::{AggregationResult, SourceScope};
use super::aggregation_traits::AggregationServiceTrait;
use crate::accounts::Account;
use crate::adapter::{normalize_account_batch, normalize_product_batch};
use crate::errors::{Error, Result};
use crate::products::Product;
use crate::store::{ExternalRecordGateway, LedgerGateway, RawRecord, SourceKind, StoreError};

/// One logical source to fetch from.
#[derive(Debug, Clone)]
enum SourceRef {
    Ledger,
    Institution(String),
}

/// Service merging records from the internal ledger and linked external
/// institutions into one ordered listing.
pub struct AggregationService {
    ledger: Arc<dyn LedgerGateway>,
    external: Arc<dyn ExternalRecordGateway>,
    home_institution: String,
}

impl AggregationService {
    /// Creates a new AggregationService instance.
    pub fn new(
        ledger: Arc<dyn LedgerGateway>,
        external: Arc<dyn ExternalRecordGateway>,
        home_institution: String,
    ) -> Self {
        Self {
            ledger,
            external,
            home_institution,
        }
    }

    /// Resolves the source set for a request.
    ///
    /// Returns the sources in fetch order plus a flag set when the
    /// institution listing itself was unreachable; in that case the
    /// aggregation proceeds over whatever remains and is marked partial.
    async fn resolve_sources(
        &self,
        user_id: &str,
        institution_id: Option<&str>,
        scope: SourceScope,
    ) -> Result<(Vec<SourceRef>, bool)> {
        if let Some(institution) = institution_id {
            if institution == self.home_institution && scope == SourceScope::All {
                return Ok((vec![SourceRef::Ledger], false));
            }
            return Ok((vec![SourceRef::Institution(institution.to_string())], false));
        }

        let mut sources = Vec::new();
        if scope == SourceScope::All {
            sources.push(SourceRef::Ledger);
        }

        match self.external.list_institutions(user_id).await {
            Ok(institutions) => {
                sources.extend(institutions.into_iter().map(SourceRef::Institution));
                Ok((sources, false))
            }
            Err(err) if err.is_transient() => {
                warn!(
                    "Institution listing unavailable for user {}: {}",
                    user_id, err
                );
                Ok((sources, true))
            }
            Err(err) => Err(Error::Store(err)),
        }
    }

    /// Folds per-source fetch outcomes into one result.
    ///
    /// The ledger is load-bearing: any ledger outage fails the whole
    /// aggregation. An unreachable external institution degrades the
    /// result to partial instead. Query rejections are programming errors
    /// and abort either way.
    fn merge_outcomes<T>(
        &self,
        sources: &[SourceRef],
        outcomes: Vec<std::result::Result<Vec<RawRecord>, StoreError>>,
        normalize: impl Fn(&[RawRecord], SourceKind) -> (Vec<T>, usize),
        entity: &str,
    ) -> Result<AggregationResult<T>> {
        let mut result = AggregationResult::empty();

        for (source, outcome) in sources.iter().zip(outcomes) {
            let (kind, institution) = match source {
                SourceRef::Ledger => (SourceKind::Internal, self.home_institution.as_str()),
                SourceRef::Institution(inst) => (SourceKind::External, inst.as_str()),
            };

            match outcome {
                Ok(docs) => {
                    let (records, dropped) = normalize(&docs, kind);
                    debug!(
                        "Source {} contributed {} {} records ({} dropped)",
                        institution,
                        records.len(),
                        entity,
                        dropped
                    );
                    result.dropped_records += dropped;
                    result.records.extend(records);
                    result.contributing_sources.push(institution.to_string());
                }
                Err(err) => match kind {
                    SourceKind::Internal => {
                        return Err(if err.is_transient() {
                            Error::InternalSourceUnavailable(err)
                        } else {
                            Error::Store(err)
                        });
                    }
                    SourceKind::External if err.is_transient() => {
                        warn!(
                            "External institution {} unavailable, continuing without it: {}",
                            institution, err
                        );
                        result.failed_sources.push(institution.to_string());
                        result.partial = true;
                    }
                    SourceKind::External => return Err(Error::Store(err)),
                },
            }
        }

        Ok(result)
    }

    /// Collapses duplicate records, keeping the first occurrence position
    /// and the last occurrence value.
    fn dedup_records<T>(
        records: Vec<T>,
        key_of: impl Fn(&T) -> (String, String),
        entity: &str,
    ) -> Vec<T> {
        let mut index_by_key: HashMap<(String, String), usize> = HashMap::new();
        let mut deduped: Vec<T> = Vec::with_capacity(records.len());

        for record in records {
            let key = key_of(&record);
            match index_by_key.get(&key) {
                Some(&existing) => {
                    warn!(
                        "Duplicate {} record {} at {} replaces earlier occurrence",
                        entity, key.0, key.1
                    );
                    deduped[existing] = record;
                }
                None => {
                    index_by_key.insert(key, deduped.len());
                    deduped.push(record);
                }
            }
        }

        deduped
    }
}

#[async_trait]
impl AggregationServiceTrait for AggregationService {
    async fn list_accounts_for_user(
        &self,
        user_id: &str,
        institution_id: Option<&str>,
        scope: SourceScope,
    ) -> Result<AggregationResult<Account>> {
        let (sources, listing_failed) =
            self.resolve_sources(user_id, institution_id, scope).await?;

        debug!(
            "Aggregating accounts for user {} across {} sources",
            user_id,
            sources.len()
        );

        // All fetches settle before the merge; the fan-out lives inside
        // this future, so a caller dropping the request aborts every
        // in-flight fetch with it.
        let fetches = sources.iter().map(|source| {
            let ledger = self.ledger.clone();
            let external = self.external.clone();
            async move {
                match source {
                    SourceRef::Ledger => ledger.fetch_accounts(user_id).await,
                    SourceRef::Institution(inst) => external.fetch_accounts(user_id, inst).await,
                }
            }
        });
        let outcomes = future::join_all(fetches).await;

        let mut result =
            self.merge_outcomes(&sources, outcomes, normalize_account_batch, "account")?;
        result.partial |= listing_failed;
        result.records = Self::dedup_records(result.records, Account::dedup_key, "account");
        Ok(result)
    }

    async fn list_products_for_user(
        &self,
        user_id: &str,
        institution_id: Option<&str>,
        scope: SourceScope,
    ) -> Result<AggregationResult<Product>> {
        let (sources, listing_failed) =
            self.resolve_sources(user_id, institution_id, scope).await?;

        debug!(
            "Aggregating products for user {} across {} sources",
            user_id,
            sources.len()
        );

        let fetches = sources.iter().map(|source| {
            let ledger = self.ledger.clone();
            let external = self.external.clone();
            async move {
                match source {
                    SourceRef::Ledger => ledger.fetch_products(user_id).await,
                    SourceRef::Institution(inst) => external.fetch_products(user_id, inst).await,
                }
            }
        });
        let outcomes = future::join_all(fetches).await;

        let mut result =
            self.merge_outcomes(&sources, outcomes, normalize_product_batch, "product")?;
        result.partial |= listing_failed;
        result.records = Self::dedup_records(result.records, Product::dedup_key, "product");
        Ok(result)
    }
}
