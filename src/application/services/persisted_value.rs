//! Persisted Value - Typed JSON wrapper over a key-value store
//!
//! Every persisted store of the app (the offline queue included) keeps one
//! serialized value under one key. This wrapper owns that key and the
//! serialize/deserialize step so callers deal only in typed values.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::application::ports::outbound::{KeyValueStorePort, PersistenceError};

pub struct PersistedValue<T> {
    store: Arc<dyn KeyValueStorePort>,
    key: String,
    _value: PhantomData<fn() -> T>,
}

impl<T> PersistedValue<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStorePort>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored value, `None` if nothing was ever saved
    ///
    /// A stored value that no longer decodes is reported as
    /// `PersistenceError::Serialization` so callers can tell it apart from an
    /// unreachable backend.
    pub async fn load(&self) -> Result<Option<T>, PersistenceError> {
        let raw = match self.store.get(&self.key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let value = serde_json::from_str(&raw)?;
        Ok(Some(value))
    }

    pub async fn save(&self, value: &T) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.key, &raw).await
    }

    pub async fn clear(&self) -> Result<(), PersistenceError> {
        self.store.remove(&self.key).await
    }
}
