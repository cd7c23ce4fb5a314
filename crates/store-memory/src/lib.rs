//! In-memory document store for the open-finance service.
//!
//! This crate realizes every store collaborator the core defines over
//! plain JSON documents held in memory: the internal ledger collections,
//! the open-finance collections fed by simulated external institutions,
//! and the bearer-token collection. It is the only storage the service
//! ships; the core stays store-agnostic and works with traits.
//!
//! The simulation side covers what the core cannot observe on its own:
//! per-institution outage switches and randomized link fixtures, so
//! partial aggregation and failure handling can be exercised end to end
//! without any real upstream.

mod seed;
mod store;

pub use seed::{seed_demo_data, SeedOptions};
pub use store::MemoryStore;
