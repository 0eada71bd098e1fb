//! Key-value persistence adapters
//!
//! Backends for the generic key-value store port. The offline queue (and any
//! other persisted store) writes one JSON document per key.

mod factory;
mod memory_kv_store;
mod sqlite_kv_store;

pub use factory::{KeyValueBackend, StoreFactory};
pub use memory_kv_store::InMemoryKeyValueStore;
pub use sqlite_kv_store::SqliteKeyValueStore;
