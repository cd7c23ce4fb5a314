use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use openfinance_core::aggregation::SourceScope;
use openfinance_core::transactions::TransactionListing;

use super::openfinance::{AccountListingResponse, UserQuery};
use crate::auth::{ensure_user_scope, RequireUser};
use crate::error::ApiResult;
use crate::main_lib::AppState;

/// Lists the user's accounts at the home institution only.
async fn fetch_accounts_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<AccountListingResponse>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let result = state
        .aggregation_service
        .list_accounts_for_user(
            &query.user_identifier,
            Some(&state.home_institution),
            SourceScope::All,
        )
        .await?;
    Ok(Json(result.into()))
}

async fn fetch_recent_transactions_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<TransactionListing>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let listing = state
        .transaction_service
        .list_recent_transactions(&query.user_identifier)
        .await?;
    Ok(Json(listing))
}

/// Ledger-only routes for the home institution's own surface.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/fetch-accounts-for-user", get(fetch_accounts_for_user))
        .route(
            "/fetch-recent-transactions-for-user",
            get(fetch_recent_transactions_for_user),
        )
}
