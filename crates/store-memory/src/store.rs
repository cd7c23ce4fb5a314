//! The in-memory document store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serde_json::{json, Value};

use openfinance_core::store::{
    ExternalRecordGateway, LedgerGateway, RawRecord, StoreError, TokenGateway,
};

use crate::seed::{external_account_doc, external_product_doc};

/// One external link a user holds, in the order it was made.
#[derive(Debug, Clone)]
struct LinkEntry {
    user_id: Option<String>,
    user_name: Option<String>,
    institution: String,
}

impl LinkEntry {
    fn matches_user(&self, identifier: &str) -> bool {
        self.user_id.as_deref() == Some(identifier)
            || self.user_name.as_deref() == Some(identifier)
    }
}

/// Document store holding every collection as plain JSON documents.
///
/// The store doubles as the institution simulation: linked external
/// institutions can be switched off per institution and the internal
/// ledger as a whole, in which case reads fail with
/// `StoreError::Unavailable` the way an unreachable upstream would.
#[derive(Default)]
pub struct MemoryStore {
    ledger_accounts: RwLock<Vec<RawRecord>>,
    ledger_products: RwLock<Vec<RawRecord>>,
    ledger_transactions: RwLock<Vec<RawRecord>>,
    external_accounts: RwLock<Vec<RawRecord>>,
    external_products: RwLock<Vec<RawRecord>>,
    tokens: RwLock<Vec<RawRecord>>,
    link_order: RwLock<Vec<LinkEntry>>,
    ledger_down: AtomicBool,
    downed_institutions: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Outage switches ===

    /// Switches the internal ledger on or off. A downed ledger fails
    /// every ledger read with `StoreError::Unavailable`.
    pub fn set_ledger_down(&self, down: bool) {
        info!("Ledger availability set to down={}", down);
        self.ledger_down.store(down, Ordering::SeqCst);
    }

    /// Switches one external institution on or off.
    pub fn set_institution_down(&self, institution_id: &str, down: bool) {
        info!(
            "Institution {} availability set to down={}",
            institution_id, down
        );
        let mut downed = self.downed_institutions.write().unwrap();
        if down {
            downed.insert(institution_id.to_string());
        } else {
            downed.remove(institution_id);
        }
    }

    // === Document inserts ===

    pub fn insert_ledger_account(&self, doc: RawRecord) {
        self.ledger_accounts.write().unwrap().push(doc);
    }

    pub fn insert_ledger_product(&self, doc: RawRecord) {
        self.ledger_products.write().unwrap().push(doc);
    }

    pub fn insert_ledger_transaction(&self, doc: RawRecord) {
        self.ledger_transactions.write().unwrap().push(doc);
    }

    /// Inserts an external account document and records the link it
    /// represents. Link order is what `list_institutions` replays.
    pub fn insert_external_account(&self, doc: RawRecord) {
        self.record_link(&doc, "AccountUser", "AccountBank");
        self.external_accounts.write().unwrap().push(doc);
    }

    pub fn insert_external_product(&self, doc: RawRecord) {
        self.record_link(&doc, "ProductCustomer", "ProductBank");
        self.external_products.write().unwrap().push(doc);
    }

    pub fn insert_token(&self, doc: RawRecord) {
        self.tokens.write().unwrap().push(doc);
    }

    // === Link simulation ===

    /// Simulates linking an account held at an external institution:
    /// generates a randomized account document in that institution's
    /// vocabulary, stores it and returns it.
    pub fn link_external_account(
        &self,
        user_id: &str,
        user_name: &str,
        institution_id: &str,
    ) -> RawRecord {
        let doc = external_account_doc(user_id, user_name, institution_id);
        debug!(
            "Linked external account at {} for user {}",
            institution_id, user_name
        );
        self.insert_external_account(doc.clone());
        doc
    }

    /// Simulates linking a financial product held at an external
    /// institution.
    pub fn link_external_product(
        &self,
        user_id: &str,
        user_name: &str,
        institution_id: &str,
    ) -> RawRecord {
        let doc = external_product_doc(user_id, user_name, institution_id);
        debug!(
            "Linked external product at {} for user {}",
            institution_id, user_name
        );
        self.insert_external_product(doc.clone());
        doc
    }

    // === Internals ===

    fn record_link(&self, doc: &RawRecord, owner_key: &str, institution_key: &str) {
        let Some(institution) = string_field(doc, &[institution_key]) else {
            return;
        };
        let entry = LinkEntry {
            user_id: string_field(doc, &[owner_key, "UserId"]),
            user_name: string_field(doc, &[owner_key, "UserName"]),
            institution,
        };
        self.link_order.write().unwrap().push(entry);
    }

    fn check_ledger(&self) -> Result<(), StoreError> {
        if self.ledger_down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "internal ledger is unreachable".to_string(),
            ));
        }
        Ok(())
    }

    fn check_institution(&self, institution_id: &str) -> Result<(), StoreError> {
        let downed = self.downed_institutions.read().unwrap();
        if downed.contains(institution_id) {
            return Err(StoreError::Unavailable(format!(
                "institution {} is unreachable",
                institution_id
            )));
        }
        Ok(())
    }

    fn ledger_docs_for_user(
        &self,
        collection: &RwLock<Vec<RawRecord>>,
        owner_key: &str,
        identifier: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        require_identifier(identifier, "user identifier")?;
        self.check_ledger()?;

        let docs = collection.read().unwrap();
        Ok(docs
            .iter()
            .filter(|doc| owner_matches(doc, owner_key, identifier))
            .cloned()
            .collect())
    }

    fn external_docs_for_user(
        &self,
        collection: &RwLock<Vec<RawRecord>>,
        owner_key: &str,
        institution_key: &str,
        identifier: &str,
        institution_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        require_identifier(identifier, "user identifier")?;
        require_identifier(institution_id, "institution id")?;
        self.check_institution(institution_id)?;

        let docs = collection.read().unwrap();
        Ok(docs
            .iter()
            .filter(|doc| {
                string_field(doc, &[institution_key]).as_deref() == Some(institution_id)
                    && owner_matches(doc, owner_key, identifier)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LedgerGateway for MemoryStore {
    async fn fetch_accounts(&self, user_id: &str) -> Result<Vec<RawRecord>, StoreError> {
        self.ledger_docs_for_user(&self.ledger_accounts, "AccountUser", user_id)
    }

    async fn fetch_products(&self, user_id: &str) -> Result<Vec<RawRecord>, StoreError> {
        self.ledger_docs_for_user(&self.ledger_products, "ProductCustomer", user_id)
    }

    /// Transactions carry account references, not owners; the user's
    /// transactions are the ones touching the user's ledger accounts.
    async fn fetch_transactions(&self, user_id: &str) -> Result<Vec<RawRecord>, StoreError> {
        let accounts = self.ledger_docs_for_user(&self.ledger_accounts, "AccountUser", user_id)?;
        let numbers: HashSet<String> = accounts
            .iter()
            .filter_map(|doc| string_field(doc, &["AccountNumber"]))
            .collect();

        let docs = self.ledger_transactions.read().unwrap();
        Ok(docs
            .iter()
            .filter(|doc| {
                string_field(doc, &["TransactionReferences", "OriginAccountNumber"])
                    .or_else(|| string_field(doc, &["AccountNumber"]))
                    .is_some_and(|number| numbers.contains(&number))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExternalRecordGateway for MemoryStore {
    async fn list_institutions(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        require_identifier(user_id, "user identifier")?;

        let links = self.link_order.read().unwrap();
        let mut seen = HashSet::new();
        let mut institutions = Vec::new();
        for entry in links.iter().filter(|entry| entry.matches_user(user_id)) {
            if seen.insert(entry.institution.clone()) {
                institutions.push(entry.institution.clone());
            }
        }
        Ok(institutions)
    }

    async fn fetch_accounts(
        &self,
        user_id: &str,
        institution_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        self.external_docs_for_user(
            &self.external_accounts,
            "AccountUser",
            "AccountBank",
            user_id,
            institution_id,
        )
    }

    async fn fetch_products(
        &self,
        user_id: &str,
        institution_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        self.external_docs_for_user(
            &self.external_products,
            "ProductCustomer",
            "ProductBank",
            user_id,
            institution_id,
        )
    }
}

#[async_trait]
impl TokenGateway for MemoryStore {
    async fn find_token(&self, bearer_token: &str) -> Result<Option<RawRecord>, StoreError> {
        let tokens = self.tokens.read().unwrap();
        Ok(tokens
            .iter()
            .find(|doc| string_field(doc, &["BearerToken"]).as_deref() == Some(bearer_token))
            .cloned())
    }

    async fn touch_token(&self, bearer_token: &str) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().unwrap();
        let Some(doc) = tokens
            .iter_mut()
            .find(|doc| string_field(doc, &["BearerToken"]).as_deref() == Some(bearer_token))
        else {
            return Err(StoreError::Query(format!(
                "no token document for bearer token {}",
                bearer_token
            )));
        };

        if let Some(obj) = doc.as_object_mut() {
            let dates = obj.entry("TokenDates").or_insert_with(|| json!({}));
            if let Some(dates) = dates.as_object_mut() {
                dates.insert("LastUseDate".to_string(), json!(Utc::now().to_rfc3339()));
            }
        }
        Ok(())
    }
}

/// Reads a string field, unwrapping `{"$oid": ...}` document ids.
fn string_field(doc: &Value, path: &[&str]) -> Option<String> {
    let mut current = doc;
    for segment in path {
        current = current.get(segment)?;
    }
    match current {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => match obj.get("$oid") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// The identifier may be the user's id or the name the source filed the
/// documents under.
fn owner_matches(doc: &Value, owner_key: &str, identifier: &str) -> bool {
    string_field(doc, &[owner_key, "UserId"]).as_deref() == Some(identifier)
        || string_field(doc, &[owner_key, "UserName"]).as_deref() == Some(identifier)
}

fn require_identifier(value: &str, what: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Query(format!("empty {}", what)));
    }
    Ok(())
}
