//! Normalization of raw store documents into canonical records.
//!
//! The functions here are the only code that reads source vocabulary.
//! Required fields (identity, owner, currency, money amounts) fail the
//! record when missing or wrong-shaped; optional fields fall back to
//! `None` and keep the record alive.

use chrono::{DateTime, Utc};
use log::warn;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use super::adapter_errors::NormalizeError;
use super::field_map::{AccountFieldMap, ProductFieldMap, TransactionFieldMap};
use crate::accounts::Account;
use crate::products::{Product, ProductType};
use crate::store::{RawRecord, SourceKind};
use crate::transactions::Transaction;

/// Normalizes one raw account document from the given source.
pub fn normalize_account(doc: &RawRecord, source: SourceKind) -> Result<Account, NormalizeError> {
    let map = AccountFieldMap::for_source(source);

    let account_id = require_string(doc, map.id)?;
    let owner_user_id = owner_identity(doc, map.owner_id, map.owner_name)?;
    let institution_id = require_string(doc, map.institution)?;
    let currency = require_currency(doc, map.currency)?;
    let balance = require_decimal(doc, map.balance)?;

    Ok(Account {
        account_id,
        owner_user_id,
        institution_id,
        source,
        category: string_at(doc, map.category),
        status: string_at(doc, map.status),
        currency,
        balance,
        as_of: datetime_at(doc, map.as_of),
    })
}

/// Normalizes one raw product document from the given source.
///
/// The outstanding amount must be non-negative; the type string is mapped
/// tolerantly and a missing or unknown type lands in `ProductType::Other`.
pub fn normalize_product(doc: &RawRecord, source: SourceKind) -> Result<Product, NormalizeError> {
    let map = ProductFieldMap::for_source(source);

    let product_id = require_string(doc, map.id)?;
    let owner_user_id = owner_identity(doc, map.owner_id, map.owner_name)?;
    let institution_id = require_string(doc, map.institution)?;
    let currency = require_currency(doc, map.currency)?;

    let outstanding_balance = require_decimal(doc, map.amount)?;
    if outstanding_balance < Decimal::ZERO {
        return Err(NormalizeError::NegativeAmount {
            field: path_name(map.amount),
            value: outstanding_balance.to_string(),
        });
    }

    let product_type = string_at(doc, map.product_type)
        .map(|raw| ProductType::from_raw(&raw))
        .unwrap_or(ProductType::Other);

    Ok(Product {
        product_id,
        owner_user_id,
        institution_id,
        source,
        product_type,
        outstanding_balance,
        currency,
        interest_rate: decimal_at(doc, map.interest_rate),
        as_of: datetime_at(doc, map.as_of),
    })
}

/// Normalizes one raw ledger transaction document.
pub fn normalize_transaction(doc: &RawRecord) -> Result<Transaction, NormalizeError> {
    let map = TransactionFieldMap::ledger();

    let transaction_id = require_string(doc, map.id)?;
    let account_number = string_at(doc, map.account_number)
        .or_else(|| string_at(doc, map.fallback_account_number))
        .ok_or_else(|| NormalizeError::MissingField {
            field: path_name(map.account_number),
        })?;
    let amount = require_decimal(doc, map.amount)?;
    let currency = require_currency(doc, map.currency)?;

    Ok(Transaction {
        transaction_id,
        account_number,
        amount,
        currency,
        posted_at: datetime_at(doc, map.posted_at),
        description: string_at(doc, map.description),
    })
}

/// Normalizes a batch of account documents, dropping malformed ones.
///
/// Returns the surviving records and the number of drops. Dropped
/// documents are logged and counted, never silently zeroed.
pub fn normalize_account_batch(docs: &[RawRecord], source: SourceKind) -> (Vec<Account>, usize) {
    normalize_batch(docs, "account", |doc| normalize_account(doc, source))
}

/// Normalizes a batch of product documents, dropping malformed ones.
pub fn normalize_product_batch(docs: &[RawRecord], source: SourceKind) -> (Vec<Product>, usize) {
    normalize_batch(docs, "product", |doc| normalize_product(doc, source))
}

/// Normalizes a batch of ledger transaction documents, dropping malformed
/// ones.
pub fn normalize_transaction_batch(docs: &[RawRecord]) -> (Vec<Transaction>, usize) {
    normalize_batch(docs, "transaction", normalize_transaction)
}

fn normalize_batch<T>(
    docs: &[RawRecord],
    entity: &str,
    normalize: impl Fn(&RawRecord) -> Result<T, NormalizeError>,
) -> (Vec<T>, usize) {
    let mut records = Vec::with_capacity(docs.len());
    let mut dropped = 0usize;

    for doc in docs {
        match normalize(doc) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!("Dropping malformed {} document: {}", entity, err);
                dropped += 1;
            }
        }
    }

    (records, dropped)
}

// === Field extraction helpers ===

fn lookup<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path {
        current = current.get(segment)?;
    }
    Some(current)
}

fn path_name(path: &[&str]) -> String {
    path.join(".")
}

/// Reads a string field. Store exports wrap object ids as
/// `{"$oid": "..."}`, which is unwrapped transparently.
fn string_at(doc: &Value, path: &[&str]) -> Option<String> {
    match lookup(doc, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Object(obj) => match obj.get("$oid") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn require_string(doc: &Value, path: &[&str]) -> Result<String, NormalizeError> {
    match lookup(doc, path) {
        None => Err(NormalizeError::MissingField {
            field: path_name(path),
        }),
        Some(_) => string_at(doc, path).ok_or_else(|| NormalizeError::InvalidField {
            field: path_name(path),
            detail: "expected a non-empty string".to_string(),
        }),
    }
}

fn require_currency(doc: &Value, path: &[&str]) -> Result<String, NormalizeError> {
    let currency = require_string(doc, path)?;
    Ok(currency.trim().to_ascii_uppercase())
}

/// The identity of a record's owner: the stable user id when present,
/// otherwise the user name the source filed the record under.
fn owner_identity(
    doc: &Value,
    id_path: &[&str],
    name_path: &[&str],
) -> Result<String, NormalizeError> {
    string_at(doc, id_path)
        .or_else(|| string_at(doc, name_path))
        .ok_or_else(|| NormalizeError::MissingField {
            field: path_name(id_path),
        })
}

/// Reads a money amount. Sources store these as JSON numbers or as
/// numeric strings; anything else is malformed.
fn decimal_at(doc: &Value, path: &[&str]) -> Option<Decimal> {
    match lookup(doc, path)? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from_i64(i)
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

fn require_decimal(doc: &Value, path: &[&str]) -> Result<Decimal, NormalizeError> {
    match lookup(doc, path) {
        None => Err(NormalizeError::MissingField {
            field: path_name(path),
        }),
        Some(_) => decimal_at(doc, path).ok_or_else(|| NormalizeError::InvalidField {
            field: path_name(path),
            detail: "expected a number or numeric string".to_string(),
        }),
    }
}

/// Reads a timestamp. Accepts RFC 3339 strings and `{"$date": "..."}`
/// store exports; anything else reads as unknown rather than failing the
/// record.
fn datetime_at(doc: &Value, path: &[&str]) -> Option<DateTime<Utc>> {
    let value = lookup(doc, path)?;
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => match obj.get("$date") {
            Some(Value::String(s)) => s.as_str(),
            _ => return None,
        },
        _ => return None,
    };

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
