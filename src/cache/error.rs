//! Error types for the cache-aside stores.

use thiserror::Error;

use crate::kv::StoreError;

/// Errors that can occur during cache round trips.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Backend read failed.
    #[error("failed to read from store (key: {key}): {source}")]
    Read {
        /// The storage key being read.
        key: String,
        /// The underlying backend error.
        #[source]
        source: StoreError,
    },

    /// Backend write failed.
    #[error("failed to write to store (key: {key}): {source}")]
    Write {
        /// The storage key being written.
        key: String,
        /// The underlying backend error.
        #[source]
        source: StoreError,
    },

    /// A stored entry exists but could not be parsed.
    #[error("failed to decode cached entry (key: {key}): {source}")]
    Decode {
        /// The storage key holding the unparseable entry.
        key: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A batch could not be serialized for writing.
    #[error("failed to encode cache batch (key: {key}): {source}")]
    Encode {
        /// The storage key the batch was destined for.
        key: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored URL string no longer parses as a URL.
    #[error("failed to parse stored URL {url} (key: {key}): {source}")]
    InvalidStoredUrl {
        /// The storage key holding the URL list.
        key: String,
        /// The offending URL string.
        url: String,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

impl CacheError {
    /// Creates a read error for `key`.
    pub fn read(key: impl Into<String>, source: StoreError) -> Self {
        Self::Read {
            key: key.into(),
            source,
        }
    }

    /// Creates a write error for `key`.
    pub fn write(key: impl Into<String>, source: StoreError) -> Self {
        Self::Write {
            key: key.into(),
            source,
        }
    }

    /// Creates a decode error for `key`.
    pub fn decode(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            key: key.into(),
            source,
        }
    }

    /// Creates an encode error for `key`.
    pub fn encode(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            key: key.into(),
            source,
        }
    }
}
