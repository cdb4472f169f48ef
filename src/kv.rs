//! Key-value storage contract and the in-memory reference backend.
//!
//! The caches treat storage as an external collaborator: any backend that can
//! get and put opaque byte values under string keys is substitutable at
//! construction time. Absence is a successful `None`, distinct from an error.
//! Backends may apply their own TTL; this crate is TTL-agnostic.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

/// Error from a key-value backend round trip.
///
/// Backends differ in failure modes (network, quota, serialization of their
/// own), so the contract carries the key and a backend-provided message
/// rather than a typed cause.
#[derive(Debug, Error)]
#[error("key-value store error (key: {key}): {message}")]
pub struct StoreError {
    /// The key the operation was addressing.
    pub key: String,
    /// Backend-provided failure description.
    pub message: String,
}

impl StoreError {
    /// Creates a store error for `key` with a backend message.
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Capability contract for cache storage backends.
///
/// `get` returns `Ok(None)` for an absent key - never an error. Values are
/// opaque bytes; the caches own their (de)serialization.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Writes `value` under `key`, replacing any existing value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value).await
    }
}

/// In-memory key-value store backed by a concurrent map.
///
/// The reference backend: used as the default store and throughout the test
/// suites. No TTL, no persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys. Test and introspection helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
