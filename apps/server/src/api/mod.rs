//! HTTP route composition.

pub mod bank;
pub mod openfinance;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::main_lib::AppState;

/// How often stale per-client limiter entries are evicted.
const LIMITER_CLEANUP_SECS: u64 = 60;

/// Assembles the full HTTP surface under `/api/v1`.
///
/// Read routes share one per-client-address budget; token validation and
/// link simulations run on a tighter one. A budget of zero disables rate
/// limiting, which also lifts the peer-address requirement so the router
/// can be driven without a connection in tests.
pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let mut read_routes = openfinance::router();
    let mut sensitive_routes = openfinance::sensitive_router();
    let mut bank_routes = bank::router();

    if config.rate_limit_per_minute > 0 {
        if let Some(standard) = GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(config.rate_limit_per_minute)
            .finish()
        {
            let standard = Arc::new(standard);
            let limiter = standard.limiter().clone();
            tokio::spawn(async move {
                let mut tick = tokio::time::interval(Duration::from_secs(LIMITER_CLEANUP_SECS));
                loop {
                    tick.tick().await;
                    tracing::debug!("Evicting idle rate limit entries ({} tracked)", limiter.len());
                    limiter.retain_recent();
                }
            });
            read_routes = read_routes.layer(GovernorLayer::new(standard.clone()));
            bank_routes = bank_routes.layer(GovernorLayer::new(standard));
        }

        // Half the standard budget, replenished at half the rate.
        if let Some(tight) = GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size((config.rate_limit_per_minute / 2).max(1))
            .finish()
        {
            let tight = Arc::new(tight);
            let limiter = tight.limiter().clone();
            tokio::spawn(async move {
                let mut tick = tokio::time::interval(Duration::from_secs(LIMITER_CLEANUP_SECS));
                loop {
                    tick.tick().await;
                    limiter.retain_recent();
                }
            });
            sensitive_routes = sensitive_routes.layer(GovernorLayer::new(tight));
        }
    }

    Router::new()
        .nest("/api/v1/openfinance", read_routes.merge(sensitive_routes))
        .nest("/api/v1/bank", bank_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
