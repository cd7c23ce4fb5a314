//! Demo fixtures: a seeded user with ledger data and simulated external
//! institutions.
//!
//! Generated documents follow each source's own vocabulary, including the
//! per-institution narrative fields real institutions decorate their
//! records with. Value ranges mirror a plausible retail-banking profile.

use chrono::{Duration, Utc};
use log::info;
use rand::Rng;
use serde_json::json;

use openfinance_core::constants::DEFAULT_HOME_INSTITUTION;
use openfinance_core::store::RawRecord;

use crate::store::MemoryStore;

/// What to seed. The defaults describe one demo user with a well-known
/// bearer token, a small ledger and two linked institutions.
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub user_id: String,
    pub user_name: String,
    pub bearer_token: String,
    pub home_institution: String,
    pub institutions: Vec<String>,
    pub accounts_per_institution: usize,
    pub products_per_institution: usize,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            user_id: "usr-1001".to_string(),
            user_name: "demo.user".to_string(),
            bearer_token: "demo-bearer-token".to_string(),
            home_institution: DEFAULT_HOME_INSTITUTION.to_string(),
            institutions: vec!["GREEN_BANK".to_string(), "APEX_BANK".to_string()],
            accounts_per_institution: 2,
            products_per_institution: 1,
        }
    }
}

/// Seeds the store with the demo user described by `options`: a bearer
/// token, two ledger accounts with recent transactions, one ledger
/// mortgage, and randomized accounts and products at every listed
/// external institution.
pub fn seed_demo_data(store: &MemoryStore, options: &SeedOptions) {
    store.insert_token(token_doc(options));

    let checking_number = account_number();
    let savings_number = account_number();
    store.insert_ledger_account(ledger_account_doc(
        options,
        &checking_number,
        "Checking",
        4500.00,
    ));
    store.insert_ledger_account(ledger_account_doc(
        options,
        &savings_number,
        "Savings",
        12250.50,
    ));
    store.insert_ledger_product(ledger_mortgage_doc(options));

    for (amount, description, days_ago) in [
        (2600.00, "Salary", 24),
        (-42.63, "Card purchase", 11),
        (-120.40, "Utility bill", 6),
        (300.00, "Incoming transfer", 2),
    ] {
        store.insert_ledger_transaction(ledger_transaction_doc(
            &checking_number,
            amount,
            description,
            days_ago,
        ));
    }

    for institution in &options.institutions {
        for _ in 0..options.accounts_per_institution {
            store.link_external_account(&options.user_id, &options.user_name, institution);
        }
        for _ in 0..options.products_per_institution {
            store.link_external_product(&options.user_id, &options.user_name, institution);
        }
    }

    info!(
        "Seeded demo data for user {} across {} external institutions",
        options.user_name,
        options.institutions.len()
    );
}

// === Document generators ===

/// A randomized account document in its institution's vocabulary.
pub(crate) fn external_account_doc(
    user_id: &str,
    user_name: &str,
    institution_id: &str,
) -> RawRecord {
    let mut rng = rand::thread_rng();
    let category = if rng.gen_bool(0.5) { "Checking" } else { "Savings" };
    let balance = rng.gen_range(2000.0..=10000.0_f64).round();
    let number = account_number();

    let mut doc = json!({
        "_id": uuid::Uuid::new_v4().to_string(),
        "AccountNumber": number,
        "AccountBank": institution_id,
        "AccountStatus": "Active",
        "AccountIdentificationType": "AccountNumber",
        "AccountDate": { "OpeningDate": past_date(5 * 365) },
        "AccountType": category,
        "AccountBalance": balance,
        "AccountCurrency": "USD",
        "AccountUser": { "UserName": user_name, "UserId": user_id },
    });

    // Institutions decorate documents with their own narrative fields;
    // normalization never reads them.
    if let Some(obj) = doc.as_object_mut() {
        if institution_id == "GREEN_BANK" {
            obj.insert(
                "GreenAccountNarrative".to_string(),
                json!(format!("{} account focused on sustainable banking", category)),
            );
        } else {
            obj.insert(
                "AccountDescription".to_string(),
                json!(format!(
                    "{} account for {} at {}",
                    category, user_name, institution_id
                )),
            );
        }
    }
    doc
}

/// A randomized loan or mortgage document in its institution's
/// vocabulary.
pub(crate) fn external_product_doc(
    user_id: &str,
    user_name: &str,
    institution_id: &str,
) -> RawRecord {
    let mut rng = rand::thread_rng();
    let product_type = if rng.gen_bool(0.5) { "Loan" } else { "Mortgage" };
    let amount = rng.gen_range(10000.0..=50000.0_f64).round();
    let interest_rate = (rng.gen_range(2.5..=5.0_f64) * 100.0).round() / 100.0;

    let mut doc = json!({
        "_id": uuid::Uuid::new_v4().to_string(),
        "ProductId": format!("{}", rng.gen_range(1000..=9999)),
        "ProductBank": institution_id,
        "ProductStatus": "Active",
        "ProductType": product_type,
        "ProductAmount": amount,
        "ProductCurrency": "USD",
        "ProductInterestRate": interest_rate,
        "ProductDate": { "OpeningDate": past_date(10 * 365) },
        "ProductCustomer": { "UserName": user_name, "UserId": user_id },
    });

    if let Some(obj) = doc.as_object_mut() {
        if institution_id == "GREEN_BANK" {
            obj.insert(
                "GreenProductNarrative".to_string(),
                json!(format!("{} tailored for sustainability", product_type)),
            );
        } else {
            obj.insert(
                "ProductDescription".to_string(),
                json!(format!(
                    "{} for {} at {}",
                    product_type, user_name, institution_id
                )),
            );
        }

        match product_type {
            "Loan" => {
                let periods = [12, 24, 36, 48, 60];
                obj.insert(
                    "RepaymentPeriod".to_string(),
                    json!(periods[rng.gen_range(0..periods.len())]),
                );
                obj.insert("LoanCollateral".to_string(), json!("None"));
            }
            _ => {
                let periods = [15, 20, 25, 30];
                obj.insert(
                    "AmortizationPeriod".to_string(),
                    json!(periods[rng.gen_range(0..periods.len())]),
                );
                obj.insert(
                    "PropertyDetails".to_string(),
                    json!({
                        "Address": "123 Main St",
                        "PropertyValue": rng.gen_range(50000.0..=100000.0_f64).round(),
                    }),
                );
            }
        }
    }
    doc
}

fn token_doc(options: &SeedOptions) -> RawRecord {
    let now = Utc::now().to_rfc3339();
    json!({
        "_id": options.user_id,
        "UserName": options.user_name,
        "BearerToken": options.bearer_token,
        "TokenDates": { "CreationDate": now, "LastUseDate": now },
    })
}

fn ledger_account_doc(
    options: &SeedOptions,
    number: &str,
    category: &str,
    balance: f64,
) -> RawRecord {
    json!({
        "_id": uuid::Uuid::new_v4().to_string(),
        "AccountNumber": number,
        "AccountBank": options.home_institution,
        "AccountStatus": "Active",
        "AccountIdentificationType": "AccountNumber",
        "AccountDate": { "OpeningDate": past_date(5 * 365) },
        "AccountType": category,
        "AccountBalance": balance,
        "AccountCurrency": "USD",
        "AccountUser": { "UserName": options.user_name, "UserId": options.user_id },
    })
}

fn ledger_mortgage_doc(options: &SeedOptions) -> RawRecord {
    json!({
        "_id": uuid::Uuid::new_v4().to_string(),
        "ProductId": "8402",
        "ProductBank": options.home_institution,
        "ProductStatus": "Active",
        "ProductType": "Mortgage",
        "ProductAmount": 185000.0,
        "ProductCurrency": "USD",
        "ProductInterestRate": 3.85,
        "ProductDate": { "OpeningDate": past_date(10 * 365) },
        "ProductCustomer": { "UserName": options.user_name, "UserId": options.user_id },
        "AmortizationPeriod": 25,
        "PropertyDetails": { "Address": "123 Main St", "PropertyValue": 96000.0 },
    })
}

fn ledger_transaction_doc(
    account_number: &str,
    amount: f64,
    description: &str,
    days_ago: i64,
) -> RawRecord {
    json!({
        "_id": uuid::Uuid::new_v4().to_string(),
        "TransactionAmount": amount,
        "TransactionCurrency": "USD",
        "TransactionDescription": description,
        "TransactionDates": {
            "TransactionDate": (Utc::now() - Duration::days(days_ago)).to_rfc3339(),
        },
        "TransactionReferences": { "OriginAccountNumber": account_number },
    })
}

fn account_number() -> String {
    rand::thread_rng()
        .gen_range(100_000_000..=999_999_999_u64)
        .to_string()
}

fn past_date(max_days: i64) -> String {
    let days = rand::thread_rng().gen_range(0..max_days);
    (Utc::now() - Duration::days(days)).to_rfc3339()
}
