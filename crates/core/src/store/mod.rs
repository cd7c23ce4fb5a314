//! Record store contracts - raw documents, gateway traits, and store errors.

mod store_errors;
mod store_model;
mod store_traits;

pub use store_errors::StoreError;
pub use store_model::{RawRecord, SourceKind};
pub use store_traits::{ExternalRecordGateway, LedgerGateway, TokenGateway};
