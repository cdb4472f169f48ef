//! Icon cache: host-keyed batches of icon records with bytes.
//!
//! Each registrable host maps to one storage entry holding a JSON array of
//! [`Icon`] records, sorted and deduplicated by URL string. Batching by host
//! bounds entry size and lets one read serve every icon a page references on
//! that host.
//!
//! Writes are merge-before-write with no transactional isolation: concurrent
//! writers for the same host can race and one merge can be lost. Cached icons
//! are re-fetchable artifacts, so availability wins over strict consistency.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use url::Url;

use super::error::CacheError;
use crate::icon::Icon;
use crate::kv::KeyValueStore;

/// Cache-aside store for downloaded icons, partitioned by host.
#[derive(Clone)]
pub struct IconCache {
    store: Arc<dyn KeyValueStore>,
}

impl IconCache {
    /// Creates an icon cache over the given storage backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Looks up icons by exact source URL.
    ///
    /// Issues one storage read per distinct host among `urls`, then filters
    /// the union of decoded batches down to exact URL-string matches. The
    /// returned flag is true iff at least one host batch existed, even when
    /// the filtered result is empty - an existing batch that lacks a
    /// requested URL still counts as a cache hit for the batch.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] or [`CacheError::Decode`] when any host
    /// lookup fails; a single bad host aborts the whole call.
    pub async fn get(&self, urls: &[Url]) -> Result<(Vec<Icon>, bool), CacheError> {
        let hosts: BTreeSet<&str> = urls.iter().map(|url| url.host_str().unwrap_or("")).collect();

        let mut batch_union = Vec::new();
        let mut found = false;

        for host in hosts {
            let Some(batch) = self.read_host_batch(host).await? else {
                continue;
            };
            found = true;
            batch_union.extend(batch);
        }

        let icons = batch_union
            .into_iter()
            .filter(|icon| {
                urls.iter()
                    .any(|requested| requested.as_str() == icon.url.as_str())
            })
            .collect();

        Ok((icons, found))
    }

    /// Stores icons, merging into each host's existing batch.
    ///
    /// Groups `icons` by host, merges each group with the batch already
    /// stored for that host, and writes the combined batch back sorted and
    /// deduplicated by URL string. When a stored and an incoming record share
    /// a URL the incoming record wins.
    ///
    /// Writes are per host; a failure aborts the call and earlier hosts are
    /// not rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`]/[`CacheError::Decode`] from the
    /// merge-before-write read, [`CacheError::Encode`] on serialization
    /// failure, or [`CacheError::Write`] when the backend write fails.
    pub async fn store(&self, icons: &[Icon]) -> Result<(), CacheError> {
        let mut by_host: BTreeMap<&str, Vec<&Icon>> = BTreeMap::new();
        for icon in icons {
            by_host
                .entry(icon.url.host_str().unwrap_or(""))
                .or_default()
                .push(icon);
        }

        for (host, batch) in by_host {
            // Existing records enter first so incoming ones overwrite on a
            // shared URL; BTreeMap iteration yields the sorted batch.
            let mut merged: BTreeMap<String, Icon> = BTreeMap::new();
            for icon in self.read_host_batch(host).await?.unwrap_or_default() {
                merged.insert(icon.url.as_str().to_string(), icon);
            }
            for icon in batch {
                merged.insert(icon.url.as_str().to_string(), icon.clone());
            }

            let combined: Vec<&Icon> = merged.values().collect();
            let encoded =
                serde_json::to_vec(&combined).map_err(|source| CacheError::encode(host, source))?;

            self.store
                .put(host, encoded)
                .await
                .map_err(|source| CacheError::write(host, source))?;
        }

        Ok(())
    }

    /// Reads and decodes one host's stored batch, `None` when absent.
    async fn read_host_batch(&self, host: &str) -> Result<Option<Vec<Icon>>, CacheError> {
        let Some(raw) = self
            .store
            .get(host)
            .await
            .map_err(|source| CacheError::read(host, source))?
        else {
            return Ok(None);
        };

        let batch =
            serde_json::from_slice(&raw).map_err(|source| CacheError::decode(host, source))?;
        Ok(Some(batch))
    }
}
