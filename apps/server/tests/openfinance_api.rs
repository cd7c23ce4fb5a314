use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use openfinance_core::summary::StaleRecordPolicy;
use openfinance_server::{api::app_router, build_state, config::Config, AppState};

const USER_NAME: &str = "ada.lovelace";
const USER_ID: &str = "usr-ada";
const BEARER: &str = "token-ada";

fn test_config() -> Config {
    Config {
        listen_addr: "127.0.0.1:0".to_string(),
        base_currency: "USD".to_string(),
        home_institution: "HOME_BANK".to_string(),
        stale_policy: StaleRecordPolicy::Include,
        seed_demo: false,
        rate_limit_per_minute: 0,
    }
}

fn ledger_account(number: &str, balance: f64) -> Value {
    json!({
        "_id": format!("doc-{}", number),
        "AccountNumber": number,
        "AccountBank": "HOME_BANK",
        "AccountStatus": "Active",
        "AccountType": "Checking",
        "AccountBalance": balance,
        "AccountCurrency": "USD",
        "AccountDate": { "OpeningDate": "2021-04-01T00:00:00Z" },
        "AccountUser": { "UserName": USER_NAME, "UserId": USER_ID },
    })
}

fn external_account(institution: &str, id: &str, balance: f64, currency: &str) -> Value {
    json!({
        "_id": id,
        "AccountNumber": format!("9{}", id),
        "AccountBank": institution,
        "AccountStatus": "Active",
        "AccountType": "Savings",
        "AccountBalance": balance,
        "AccountCurrency": currency,
        "AccountDate": { "OpeningDate": "2022-10-15T00:00:00Z" },
        "AccountUser": { "UserName": USER_NAME, "UserId": USER_ID },
    })
}

fn ledger_mortgage(product_id: &str, amount: f64) -> Value {
    json!({
        "_id": { "$oid": "64f000000000000000000001" },
        "ProductId": product_id,
        "ProductBank": "HOME_BANK",
        "ProductStatus": "Active",
        "ProductType": "Mortgage",
        "ProductAmount": amount,
        "ProductCurrency": "USD",
        "ProductInterestRate": 3.85,
        "ProductDate": { "OpeningDate": "2019-06-01T00:00:00Z" },
        "ProductCustomer": { "UserName": USER_NAME, "UserId": USER_ID },
        "AmortizationPeriod": 25,
    })
}

fn external_product(institution: &str, id: &str, kind: &str, amount: f64) -> Value {
    json!({
        "_id": id,
        "ProductBank": institution,
        "ProductStatus": "Active",
        "ProductType": kind,
        "ProductAmount": amount,
        "ProductCurrency": "USD",
        "ProductInterestRate": 4.2,
        "ProductDate": { "OpeningDate": "2023-02-10T00:00:00Z" },
        "ProductCustomer": { "UserName": USER_NAME, "UserId": USER_ID },
    })
}

fn ledger_transaction(account_number: &str, id: &str, amount: f64, date: &str) -> Value {
    json!({
        "_id": id,
        "TransactionAmount": amount,
        "TransactionCurrency": "USD",
        "TransactionDescription": "Card purchase",
        "TransactionDates": { "TransactionDate": date },
        "TransactionReferences": { "OriginAccountNumber": account_number },
    })
}

/// One user with a ledger account and mortgage, two linked institutions
/// and one liability plus one investment held externally.
fn fixture_state(config: &Config) -> Arc<AppState> {
    let state = build_state(config).unwrap();
    let store = &state.store;

    store.insert_token(json!({
        "_id": USER_ID,
        "UserName": USER_NAME,
        "BearerToken": BEARER,
        "TokenDates": { "CreationDate": "2026-01-05T09:00:00Z" },
    }));

    store.insert_ledger_account(ledger_account("100200300", 1000.5));
    store.insert_external_account(external_account("GREEN_BANK", "g1", 250.25, "USD"));
    store.insert_external_account(external_account("APEX_BANK", "a1", 99.25, "USD"));

    store.insert_ledger_product(ledger_mortgage("8402", 185000.5));
    store.insert_external_product(external_product("GREEN_BANK", "gp1", "Loan", 12000.25));
    store.insert_external_product(external_product("APEX_BANK", "ap1", "Investment", 9999.0));

    state
}

async fn get_json(app: &axum::Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &axum::Router, uri: &str, bearer: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_bearer_token_is_a_bad_request() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = format!(
        "/api/v1/openfinance/fetch-external-accounts-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("token"));
}

#[tokio::test]
async fn unknown_bearer_token_is_forbidden() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = format!(
        "/api/v1/openfinance/fetch-external-accounts-for-user?user_identifier={USER_NAME}"
    );
    let (status, _) = get_json(&app, &uri, Some("not-a-token")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn token_for_another_user_is_forbidden() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = "/api/v1/openfinance/fetch-external-accounts-for-user?user_identifier=bob";
    let (status, _) = get_json(&app, uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn external_accounts_listing_reports_sources_and_drops() {
    let config = test_config();
    let state = fixture_state(&config);
    // A document an institution filed without a balance is dropped, not
    // zeroed.
    state.store.insert_external_account(json!({
        "_id": "broken",
        "AccountBank": "GREEN_BANK",
        "AccountCurrency": "USD",
        "AccountUser": { "UserName": USER_NAME, "UserId": USER_ID },
    }));
    let app = app_router(state, &config);

    let uri = format!(
        "/api/v1/openfinance/fetch-external-accounts-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);

    let accounts = body["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["accountId"], "g1");
    assert_eq!(accounts[0]["institutionId"], "GREEN_BANK");
    assert_eq!(accounts[0]["source"], "external");
    assert_eq!(accounts[0]["balance"], 250.25);
    assert_eq!(body["contributingSources"], json!(["GREEN_BANK", "APEX_BANK"]));
    assert_eq!(body["failedSources"], json!([]));
    assert_eq!(body["droppedRecords"], 1);
    assert_eq!(body["partial"], false);
}

#[tokio::test]
async fn institution_filter_narrows_the_listing() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = format!(
        "/api/v1/openfinance/fetch-external-accounts-for-user-and-institution?user_identifier={USER_NAME}&institution_name=GREEN_BANK"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);

    let accounts = body["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["accountId"], "g1");
    assert_eq!(body["contributingSources"], json!(["GREEN_BANK"]));
}

#[tokio::test]
async fn external_products_listing_keeps_every_type() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = format!(
        "/api/v1/openfinance/fetch-external-products-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);

    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["productId"], "gp1");
    assert_eq!(products[0]["productType"], "loan");
    assert_eq!(products[1]["productType"], "investment");
}

#[tokio::test]
async fn total_balance_spans_ledger_and_institutions() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = format!(
        "/api/v1/openfinance/calculate-total-balance-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["totalBalance"], 1350.0);
    assert_eq!(body["currency"], "USD");
    assert_eq!(
        body["contributingSources"],
        json!(["HOME_BANK", "GREEN_BANK", "APEX_BANK"])
    );
    assert_eq!(body["partial"], false);
    assert_eq!(body["staleRecords"], 0);
}

#[tokio::test]
async fn total_debt_counts_liabilities_only() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = format!(
        "/api/v1/openfinance/calculate-debt-balance-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);

    // Mortgage and loan sum; the investment held at APEX_BANK does not.
    assert_eq!(body["totalDebt"], 197000.75);
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn downed_institution_degrades_to_partial() {
    let config = test_config();
    let state = fixture_state(&config);
    state.store.set_institution_down("APEX_BANK", true);
    let app = app_router(state, &config);

    let uri = format!(
        "/api/v1/openfinance/fetch-external-accounts-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["partial"], true);
    assert_eq!(body["failedSources"], json!(["APEX_BANK"]));
    assert_eq!(body["accounts"].as_array().unwrap().len(), 1);

    let uri = format!(
        "/api/v1/openfinance/calculate-total-balance-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalBalance"], 1250.75);
    assert_eq!(body["partial"], true);
}

#[tokio::test]
async fn downed_ledger_fails_the_balance_metric() {
    let config = test_config();
    let state = fixture_state(&config);
    state.store.set_ledger_down(true);
    let app = app_router(state, &config);

    let uri = format!(
        "/api/v1/openfinance/calculate-total-balance-for-user?user_identifier={USER_NAME}"
    );
    let (status, _) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // External listings do not touch the ledger and stay up.
    let uri = format!(
        "/api/v1/openfinance/fetch-external-accounts-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["partial"], false);
}

#[tokio::test]
async fn mixed_currencies_conflict() {
    let config = test_config();
    let state = fixture_state(&config);
    state
        .store
        .insert_external_account(external_account("GREEN_BANK", "g2", 80.0, "EUR"));
    let app = app_router(state, &config);

    let uri = format!(
        "/api/v1/openfinance/calculate-total-balance-for-user?user_identifier={USER_NAME}"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("EUR"));
}

#[tokio::test]
async fn validate_token_names_the_user() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let (status, body) = post_json(
        &app,
        "/api/v1/openfinance/validate-token",
        BEARER,
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Bearer token is valid for user: {USER_NAME}")
    );
}

#[tokio::test]
async fn linking_appends_a_readable_document() {
    let config = test_config();
    let state = fixture_state(&config);
    let app = app_router(state, &config);

    let (status, body) = post_json(
        &app,
        "/api/v1/openfinance/link-external-account-for-user",
        BEARER,
        json!({ "userIdentifier": USER_NAME, "institutionName": "NORTH_BANK" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["institutionId"], "NORTH_BANK");
    assert_eq!(body["account"]["source"], "external");

    let uri = format!(
        "/api/v1/openfinance/fetch-external-accounts-for-user-and-institution?user_identifier={USER_NAME}&institution_name=NORTH_BANK"
    );
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts"].as_array().unwrap().len(), 1);

    let (status, body) = post_json(
        &app,
        "/api/v1/openfinance/link-external-product-for-user",
        BEARER,
        json!({ "userIdentifier": USER_NAME, "institutionName": "NORTH_BANK" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["institutionId"], "NORTH_BANK");
}

#[tokio::test]
async fn bank_accounts_stay_ledger_only() {
    let config = test_config();
    let app = app_router(fixture_state(&config), &config);

    let uri = format!("/api/v1/bank/fetch-accounts-for-user?user_identifier={USER_NAME}");
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);

    let accounts = body["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["source"], "internal");
    assert_eq!(body["contributingSources"], json!(["HOME_BANK"]));
}

#[tokio::test]
async fn bank_transactions_come_newest_first() {
    let config = test_config();
    let state = fixture_state(&config);
    state.store.insert_ledger_transaction(ledger_transaction(
        "100200300",
        "t-old",
        -42.5,
        "2026-05-01T10:00:00Z",
    ));
    state.store.insert_ledger_transaction(ledger_transaction(
        "100200300",
        "t-new",
        2600.0,
        "2026-08-01T10:00:00Z",
    ));
    let app = app_router(state, &config);

    let uri = format!("/api/v1/bank/fetch-recent-transactions-for-user?user_identifier={USER_NAME}");
    let (status, body) = get_json(&app, &uri, Some(BEARER)).await;
    assert_eq!(status, StatusCode::OK);

    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["transactionId"], "t-new");
    assert_eq!(transactions[1]["transactionId"], "t-old");
    assert_eq!(body["droppedRecords"], 0);
}
