//! Link cache: the icon URLs discovered for a page.
//!
//! Keyed by normalized page key: `host + path` (one trailing slash stripped),
//! plus `?query` when the page URL carries one. The query matters - two
//! otherwise-identical paths that differ only by query string may expose
//! different icon sets. Values are a JSON array of URL strings, sorted and
//! deduplicated.

use std::sync::Arc;

use url::Url;

use super::error::CacheError;
use crate::kv::KeyValueStore;

/// Cache-aside store mapping a page to its discovered icon URL list.
#[derive(Clone)]
pub struct LinkCache {
    store: Arc<dyn KeyValueStore>,
}

impl LinkCache {
    /// Creates a link cache over the given storage backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the icon URL list recorded for `page_url`.
    ///
    /// Returns `(urls, true)` on a hit and `(empty, false)` on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] on a backend failure,
    /// [`CacheError::Decode`] when the stored entry is not a JSON string
    /// array, and [`CacheError::InvalidStoredUrl`] when a stored string no
    /// longer parses as a URL.
    pub async fn get_icon_urls(&self, page_url: &Url) -> Result<(Vec<Url>, bool), CacheError> {
        let key = page_key(page_url);

        let Some(raw) = self
            .store
            .get(&key)
            .await
            .map_err(|source| CacheError::read(&key, source))?
        else {
            return Ok((Vec::new(), false));
        };

        let stored: Vec<String> =
            serde_json::from_slice(&raw).map_err(|source| CacheError::decode(&key, source))?;

        let mut urls = Vec::with_capacity(stored.len());
        for url_str in stored {
            let url = Url::parse(&url_str).map_err(|source| CacheError::InvalidStoredUrl {
                key: key.clone(),
                url: url_str,
                source,
            })?;
            urls.push(url);
        }

        Ok((urls, true))
    }

    /// Records icon URLs for `page_url`, merging with any existing list.
    ///
    /// The merge concatenates existing-then-new, sorts lexicographically, and
    /// deduplicates by exact string - storing the same set twice persists the
    /// identical list (idempotent).
    ///
    /// # Errors
    ///
    /// Propagates the read-path errors of [`Self::get_icon_urls`], plus
    /// [`CacheError::Encode`] and [`CacheError::Write`] for the write-back.
    pub async fn store_icon_urls(&self, page_url: &Url, new_urls: &[Url]) -> Result<(), CacheError> {
        let key = page_key(page_url);

        let (existing, _) = self.get_icon_urls(page_url).await?;

        let mut merged: Vec<String> = existing
            .iter()
            .chain(new_urls)
            .map(|url| url.as_str().to_string())
            .collect();
        merged.sort();
        merged.dedup();

        let encoded =
            serde_json::to_vec(&merged).map_err(|source| CacheError::encode(&key, source))?;

        self.store
            .put(&key, encoded)
            .await
            .map_err(|source| CacheError::write(&key, source))
    }
}

/// Normalized page key: `host + path [+ "?" + query]`, with at most one
/// trailing slash stripped from the path.
fn page_key(page_url: &Url) -> String {
    let mut key = String::new();
    if let Some(host) = page_url.host_str() {
        key.push_str(host);
    }
    let path = page_url.path();
    key.push_str(path.strip_suffix('/').unwrap_or(path));
    if let Some(query) = page_url.query() {
        key.push('?');
        key.push_str(query);
    }
    key
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn cache() -> (LinkCache, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (LinkCache::new(store.clone()), store)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_page_key_strips_trailing_slash() {
        assert_eq!(page_key(&url("https://example.com/app/")), "example.com/app");
        assert_eq!(page_key(&url("https://example.com/app")), "example.com/app");
        assert_eq!(page_key(&url("https://example.com/")), "example.com");
    }

    #[test]
    fn test_page_key_strips_at_most_one_slash() {
        assert_eq!(
            page_key(&url("https://example.com/app//")),
            "example.com/app/"
        );
    }

    #[test]
    fn test_page_key_keeps_query() {
        assert_eq!(
            page_key(&url("https://example.com/app?tab=1")),
            "example.com/app?tab=1"
        );
        // Same path, different query: distinct keys.
        assert_ne!(
            page_key(&url("https://example.com/app?tab=1")),
            page_key(&url("https://example.com/app?tab=2"))
        );
    }

    #[tokio::test]
    async fn test_miss_returns_empty_not_found() {
        let (cache, _store) = cache();
        let (urls, found) = cache
            .get_icon_urls(&url("https://example.com/page"))
            .await
            .unwrap();
        assert!(urls.is_empty());
        assert!(!found);
    }

    #[tokio::test]
    async fn test_store_then_get_round_trip() {
        let (cache, _store) = cache();
        let page = url("https://example.com/page");
        let a = url("https://example.com/a.png");
        let b = url("https://example.com/b.png");

        cache
            .store_icon_urls(&page, &[a.clone(), b.clone()])
            .await
            .unwrap();

        let (urls, found) = cache.get_icon_urls(&page).await.unwrap();
        assert!(found);
        assert_eq!(urls, vec![a, b], "sorted, deduplicated membership");
    }

    #[tokio::test]
    async fn test_store_dedups_and_is_idempotent() {
        let (cache, store) = cache();
        let page = url("https://example.com/page");
        let a = url("https://example.com/a.png");
        let b = url("https://example.com/b.png");

        cache
            .store_icon_urls(&page, &[a.clone(), a.clone(), b.clone()])
            .await
            .unwrap();
        let first = store.get("example.com/page").await.unwrap().unwrap();

        cache.store_icon_urls(&page, &[b.clone()]).await.unwrap();
        let second = store.get("example.com/page").await.unwrap().unwrap();

        assert_eq!(first, second, "re-storing a subset must not change the list");

        let (urls, _) = cache.get_icon_urls(&page).await.unwrap();
        assert_eq!(urls, vec![a, b]);
    }

    #[tokio::test]
    async fn test_persisted_form_is_string_array() {
        let (cache, store) = cache();
        let page = url("https://example.com/page");
        cache
            .store_icon_urls(&page, &[url("https://example.com/a.png")])
            .await
            .unwrap();

        let raw = store.get("example.com/page").await.unwrap().unwrap();
        let decoded: Vec<String> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(decoded, vec!["https://example.com/a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_decode_error() {
        let (cache, store) = cache();
        store
            .put("example.com/page", b"{broken".to_vec())
            .await
            .unwrap();

        let result = cache.get_icon_urls(&url("https://example.com/page")).await;
        assert!(matches!(result, Err(CacheError::Decode { .. })));
    }
}
