use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use openfinance_core::aggregation::{AggregationService, AggregationServiceTrait};
use openfinance_core::auth::{TokenAuthService, TokenAuthServiceTrait};
use openfinance_core::summary::{SummaryService, SummaryServiceTrait};
use openfinance_core::transactions::{TransactionService, TransactionServiceTrait};
use openfinance_store_memory::{seed_demo_data, MemoryStore, SeedOptions};

use crate::config::Config;

pub struct AppState {
    pub aggregation_service: Arc<dyn AggregationServiceTrait + Send + Sync>,
    pub summary_service: Arc<dyn SummaryServiceTrait + Send + Sync>,
    pub transaction_service: Arc<dyn TransactionServiceTrait + Send + Sync>,
    pub auth_service: Arc<dyn TokenAuthServiceTrait + Send + Sync>,
    /// The concrete store, kept for the link simulation endpoints and for
    /// institution outage toggles.
    pub store: Arc<MemoryStore>,
    pub home_institution: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("OPENFIN_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Arc::new(MemoryStore::new());

    if config.seed_demo {
        let options = SeedOptions {
            home_institution: config.home_institution.clone(),
            ..SeedOptions::default()
        };
        seed_demo_data(&store, &options);
        tracing::info!(
            "Demo data seeded; authenticate as {} with bearer token {}",
            options.user_name,
            options.bearer_token
        );
    }

    let aggregation_service: Arc<dyn AggregationServiceTrait + Send + Sync> =
        Arc::new(AggregationService::new(
            store.clone(),
            store.clone(),
            config.home_institution.clone(),
        ));

    let summary_service: Arc<dyn SummaryServiceTrait + Send + Sync> = Arc::new(
        SummaryService::new(config.base_currency.clone(), config.stale_policy),
    );

    let transaction_service: Arc<dyn TransactionServiceTrait + Send + Sync> =
        Arc::new(TransactionService::new(store.clone()));

    let auth_service: Arc<dyn TokenAuthServiceTrait + Send + Sync> =
        Arc::new(TokenAuthService::new(store.clone()));

    Ok(Arc::new(AppState {
        aggregation_service,
        summary_service,
        transaction_service,
        auth_service,
        store,
        home_institution: config.home_institution.clone(),
    }))
}
