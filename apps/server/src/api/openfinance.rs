use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use openfinance_core::accounts::Account;
use openfinance_core::adapter::{normalize_account, normalize_product};
use openfinance_core::aggregation::{AggregationResult, SourceScope};
use openfinance_core::errors::Error as CoreError;
use openfinance_core::products::Product;
use openfinance_core::store::SourceKind;
use openfinance_core::summary::SummaryMetric;

use crate::auth::{ensure_user_scope, RequireUser};
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct UserQuery {
    pub user_identifier: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserInstitutionQuery {
    pub user_identifier: String,
    pub institution_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkRequest {
    user_identifier: String,
    institution_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountListingResponse {
    pub accounts: Vec<Account>,
    pub contributing_sources: Vec<String>,
    pub failed_sources: Vec<String>,
    pub dropped_records: usize,
    pub partial: bool,
}

impl From<AggregationResult<Account>> for AccountListingResponse {
    fn from(result: AggregationResult<Account>) -> Self {
        Self {
            accounts: result.records,
            contributing_sources: result.contributing_sources,
            failed_sources: result.failed_sources,
            dropped_records: result.dropped_records,
            partial: result.partial,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductListingResponse {
    pub products: Vec<Product>,
    pub contributing_sources: Vec<String>,
    pub failed_sources: Vec<String>,
    pub dropped_records: usize,
    pub partial: bool,
}

impl From<AggregationResult<Product>> for ProductListingResponse {
    fn from(result: AggregationResult<Product>) -> Self {
        Self {
            products: result.records,
            contributing_sources: result.contributing_sources,
            failed_sources: result.failed_sources,
            dropped_records: result.dropped_records,
            partial: result.partial,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalBalanceResponse {
    total_balance: Decimal,
    currency: String,
    contributing_sources: Vec<String>,
    partial: bool,
    stale_records: usize,
}

impl From<SummaryMetric> for TotalBalanceResponse {
    fn from(metric: SummaryMetric) -> Self {
        Self {
            total_balance: metric.value,
            currency: metric.currency,
            contributing_sources: metric.contributing_sources,
            partial: metric.partial,
            stale_records: metric.stale_records,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalDebtResponse {
    total_debt: Decimal,
    currency: String,
    contributing_sources: Vec<String>,
    partial: bool,
    stale_records: usize,
}

impl From<SummaryMetric> for TotalDebtResponse {
    fn from(metric: SummaryMetric) -> Self {
        Self {
            total_debt: metric.value,
            currency: metric.currency,
            contributing_sources: metric.contributing_sources,
            partial: metric.partial,
            stale_records: metric.stale_records,
        }
    }
}

async fn fetch_external_accounts_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<AccountListingResponse>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let result = state
        .aggregation_service
        .list_accounts_for_user(&query.user_identifier, None, SourceScope::ExternalOnly)
        .await?;
    Ok(Json(result.into()))
}

async fn fetch_external_accounts_for_user_and_institution(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserInstitutionQuery>,
) -> ApiResult<Json<AccountListingResponse>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let result = state
        .aggregation_service
        .list_accounts_for_user(
            &query.user_identifier,
            Some(&query.institution_name),
            SourceScope::ExternalOnly,
        )
        .await?;
    Ok(Json(result.into()))
}

async fn fetch_external_products_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<ProductListingResponse>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let result = state
        .aggregation_service
        .list_products_for_user(&query.user_identifier, None, SourceScope::ExternalOnly)
        .await?;
    Ok(Json(result.into()))
}

async fn fetch_external_products_for_user_and_institution(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserInstitutionQuery>,
) -> ApiResult<Json<ProductListingResponse>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let result = state
        .aggregation_service
        .list_products_for_user(
            &query.user_identifier,
            Some(&query.institution_name),
            SourceScope::ExternalOnly,
        )
        .await?;
    Ok(Json(result.into()))
}

async fn calculate_total_balance_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<TotalBalanceResponse>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let result = state
        .aggregation_service
        .list_accounts_for_user(&query.user_identifier, None, SourceScope::All)
        .await?;
    let metric = state.summary_service.total_balance(&result)?;
    Ok(Json(metric.into()))
}

async fn calculate_debt_balance_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<TotalDebtResponse>> {
    ensure_user_scope(&user, &query.user_identifier)?;
    let result = state
        .aggregation_service
        .list_products_for_user(&query.user_identifier, None, SourceScope::All)
        .await?;
    let metric = state.summary_service.total_debt(&result)?;
    Ok(Json(metric.into()))
}

/// Bearer-token health check.
async fn validate_token(RequireUser(user): RequireUser) -> ApiResult<Json<Value>> {
    Ok(Json(json!({
        "message": format!("Bearer token is valid for user: {}", user.user_name),
    })))
}

async fn link_external_account_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Json(request): Json<LinkRequest>,
) -> ApiResult<Json<Value>> {
    ensure_user_scope(&user, &request.user_identifier)?;
    let doc = state
        .store
        .link_external_account(&user.user_id, &user.user_name, &request.institution_name);
    let account = normalize_account(&doc, SourceKind::External).map_err(CoreError::from)?;
    Ok(Json(json!({
        "message": format!(
            "External account linked for {} at {}",
            user.user_name, request.institution_name
        ),
        "account": account,
    })))
}

async fn link_external_product_for_user(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    Json(request): Json<LinkRequest>,
) -> ApiResult<Json<Value>> {
    ensure_user_scope(&user, &request.user_identifier)?;
    let doc = state
        .store
        .link_external_product(&user.user_id, &user.user_name, &request.institution_name);
    let product = normalize_product(&doc, SourceKind::External).map_err(CoreError::from)?;
    Ok(Json(json!({
        "message": format!(
            "External product linked for {} at {}",
            user.user_name, request.institution_name
        ),
        "product": product,
    })))
}

/// Read-side routes, rate limited at the standard budget.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/fetch-external-accounts-for-user",
            get(fetch_external_accounts_for_user),
        )
        .route(
            "/fetch-external-accounts-for-user-and-institution",
            get(fetch_external_accounts_for_user_and_institution),
        )
        .route(
            "/fetch-external-products-for-user",
            get(fetch_external_products_for_user),
        )
        .route(
            "/fetch-external-products-for-user-and-institution",
            get(fetch_external_products_for_user_and_institution),
        )
        .route(
            "/calculate-total-balance-for-user",
            get(calculate_total_balance_for_user),
        )
        .route(
            "/calculate-debt-balance-for-user",
            get(calculate_debt_balance_for_user),
        )
}

/// Token checks and link simulations run on a tighter budget.
pub fn sensitive_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/validate-token", post(validate_token))
        .route(
            "/link-external-account-for-user",
            post(link_external_account_for_user),
        )
        .route(
            "/link-external-product-for-user",
            post(link_external_product_for_user),
        )
}
