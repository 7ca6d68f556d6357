//! Remote Persistence
//!
//! Key-addressed JSON document store reached over HTTP. Eventually
//! consistent, no transactions.

mod traits;
mod rest;

pub use traits::RemotePersistence;
pub use rest::{RestRepository, collection_url, record_url, parse_collection, parse_created_id};
