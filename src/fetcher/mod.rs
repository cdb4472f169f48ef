//! Icon fetcher: the orchestrator composing caches and scraper.
//!
//! Three public operations:
//!
//! - [`IconFetcher::cache_icons`] - warm the caches with caller-supplied
//!   icon URLs for a page.
//! - [`IconFetcher::fetch_icons`] - resolve a page's canonical icon set.
//!   Never errors: cache and network failures degrade to an empty or partial
//!   set, logged.
//! - [`IconFetcher::one`] - resolve a single icon by exact URL.
//!
//! Read paths are cache-aside: consult the cache, fall back to the scraper
//! on a miss, persist what came back. Canonicalization
//! ([`canonical::ensure_big_icon`]) runs on every resolved set so callers
//! always see a 512x512-labeled entry when any icon exists.

mod canonical;

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::cache::{CacheError, IconCache, LinkCache};
use crate::icon::Icon;
use crate::kv::KeyValueStore;
use crate::scrape::IconScraper;

/// Orchestrator for icon resolution: link cache → scraper → icon cache →
/// canonicalization.
#[derive(Clone)]
pub struct IconFetcher {
    scraper: IconScraper,
    icons: IconCache,
    links: LinkCache,
}

impl IconFetcher {
    /// Creates a fetcher from its collaborators.
    pub fn new(scraper: IconScraper, icons: IconCache, links: LinkCache) -> Self {
        Self {
            scraper,
            icons,
            links,
        }
    }

    /// Creates a fetcher over two storage namespaces, one per cache.
    ///
    /// The namespaces must be distinct: the icon cache keys by bare host and
    /// the link cache keys by host+path, so a page at a host's root would
    /// collide with that host's icon batch in a shared namespace.
    pub fn with_stores(
        scraper: IconScraper,
        icon_store: Arc<dyn KeyValueStore>,
        link_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::new(scraper, IconCache::new(icon_store), LinkCache::new(link_store))
    }

    /// Downloads caller-supplied icon URLs and warms both caches.
    ///
    /// No-op for an empty list, and for a list whose downloads all fail
    /// (nothing to store). Icon bytes are stored first; recording the
    /// page→URL association afterwards is best-effort - a link-cache write
    /// failure is logged and swallowed because the bytes are already cached.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the icon-cache write fails. This is a
    /// direct user action expecting confirmation, so storage failures
    /// propagate.
    pub async fn cache_icons(&self, page_url: &Url, icon_urls: &[Url]) -> Result<(), CacheError> {
        if icon_urls.is_empty() {
            return Ok(());
        }

        let icons = self.scraper.download_icons(icon_urls).await;
        if icons.is_empty() {
            return Ok(());
        }

        self.icons.store(&icons).await?;

        if let Err(error) = self.links.store_icon_urls(page_url, icon_urls).await {
            warn!(page = %page_url, error = %error, "failed to store icon URLs");
        }

        Ok(())
    }

    /// Resolves a page's canonical icon set.
    ///
    /// Icon URLs come from the link cache, falling back to a live scrape on
    /// a miss (persisting the scrape result). Icon bytes come from the icon
    /// cache, falling back to a batch download on a miss (persisting on
    /// success). The resolved set is canonicalized before return.
    ///
    /// Never returns an error: every failure on this path is logged and
    /// degrades to an empty (or partial, for cache-write failures after a
    /// successful download) result. A page with no discoverable icons
    /// resolves to an empty set.
    pub async fn fetch_icons(&self, page_url: &Url) -> Vec<Icon> {
        let icon_urls = match self.links.get_icon_urls(page_url).await {
            Ok((icon_urls, true)) => icon_urls,
            Ok((_, false)) => match self.scrape_and_persist_urls(page_url).await {
                Some(icon_urls) => icon_urls,
                None => return Vec::new(),
            },
            Err(error) => {
                warn!(page = %page_url, error = %error, "failed to read icon URLs from cache");
                return Vec::new();
            }
        };

        if icon_urls.is_empty() {
            return Vec::new();
        }

        let icons = match self.icons.get(&icon_urls).await {
            Ok((icons, true)) => icons,
            Ok((_, false)) => {
                let icons = self.scraper.download_icons(&icon_urls).await;
                if let Err(error) = self.icons.store(&icons).await {
                    warn!(page = %page_url, error = %error, "failed to store icons in cache");
                }
                icons
            }
            Err(error) => {
                warn!(page = %page_url, error = %error, "failed to read icons from cache");
                return Vec::new();
            }
        };

        debug!(page = %page_url, count = icons.len(), "resolved icon set");
        canonical::ensure_big_icon(icons)
    }

    /// Resolves a single icon by exact URL.
    ///
    /// Consults the icon cache first, falling back to a single-URL download
    /// (persisted on success). `Ok(None)` means the icon truly cannot be
    /// found - the download was dropped or the cache batch lacks the URL -
    /// and is distinct from a storage failure.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when a cache read or the post-download write
    /// fails.
    pub async fn one(&self, icon_url: &Url) -> Result<Option<Icon>, CacheError> {
        let requested = std::slice::from_ref(icon_url);
        let (mut icons, found) = self.icons.get(requested).await?;

        if !found {
            icons = self.scraper.download_icons(requested).await;
            self.icons.store(&icons).await?;
        }

        Ok(icons.into_iter().next())
    }

    /// Scrapes icon URLs for a page and persists them; `None` when either
    /// step fails (logged).
    async fn scrape_and_persist_urls(&self, page_url: &Url) -> Option<Vec<Url>> {
        let icon_urls = match self.scraper.scrape_icon_urls(page_url).await {
            Ok(icon_urls) => icon_urls,
            Err(error) => {
                warn!(page = %page_url, error = %error, "failed to scrape icon URLs");
                return None;
            }
        };

        if let Err(error) = self.links.store_icon_urls(page_url, &icon_urls).await {
            warn!(page = %page_url, error = %error, "failed to store icon URLs");
            return None;
        }

        Some(icon_urls)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::icon::{ImageProps, ImageSize};
    use crate::kv::{MemoryStore, StoreError};

    /// Store whose reads always fail.
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::new(key, "backend unavailable"))
        }

        async fn put(&self, key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
            Err(StoreError::new(key, "backend unavailable"))
        }
    }

    fn icon(url: &str, mime: &str, width: u32, height: u32) -> Icon {
        Icon {
            url: Url::parse(url).unwrap(),
            body: b"bytes".to_vec(),
            props: ImageProps {
                mime_type: mime.to_string(),
                size: ImageSize::new(width, height),
            },
        }
    }

    fn memory_fetcher() -> (IconFetcher, Arc<MemoryStore>, Arc<MemoryStore>) {
        let icon_store = Arc::new(MemoryStore::new());
        let link_store = Arc::new(MemoryStore::new());
        let fetcher = IconFetcher::with_stores(
            IconScraper::new(),
            icon_store.clone(),
            link_store.clone(),
        );
        (fetcher, icon_store, link_store)
    }

    #[tokio::test]
    async fn test_cache_icons_empty_list_is_noop() {
        let (fetcher, icon_store, link_store) = memory_fetcher();
        let page = Url::parse("https://example.com/").unwrap();

        fetcher.cache_icons(&page, &[]).await.unwrap();
        assert!(icon_store.is_empty(), "no downloads, no writes");
        assert!(link_store.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_icons_cache_hit_path_never_touches_network() {
        // Both caches are pre-populated, so resolution must complete without
        // any HTTP request (the scraper points nowhere usable).
        let (fetcher, icon_store, link_store) = memory_fetcher();
        let page = Url::parse("https://example.com/app").unwrap();
        let cached = icon("https://example.com/a.png", "image/png", 512, 512);

        let icons_cache = IconCache::new(icon_store as Arc<dyn KeyValueStore>);
        let links_cache = LinkCache::new(link_store as Arc<dyn KeyValueStore>);
        icons_cache.store(std::slice::from_ref(&cached)).await.unwrap();
        links_cache
            .store_icon_urls(&page, std::slice::from_ref(&cached.url))
            .await
            .unwrap();

        let resolved = fetcher.fetch_icons(&page).await;
        assert_eq!(resolved, vec![cached], "exact 512x512 entry, no append");
    }

    #[tokio::test]
    async fn test_fetch_icons_appends_synthetic_from_cached_set() {
        let (fetcher, icon_store, link_store) = memory_fetcher();
        let page = Url::parse("https://example.com/app").unwrap();
        let small = icon("https://example.com/small.png", "image/png", 32, 32);

        let icons_cache = IconCache::new(icon_store as Arc<dyn KeyValueStore>);
        let links_cache = LinkCache::new(link_store as Arc<dyn KeyValueStore>);
        icons_cache.store(std::slice::from_ref(&small)).await.unwrap();
        links_cache
            .store_icon_urls(&page, std::slice::from_ref(&small.url))
            .await
            .unwrap();

        let resolved = fetcher.fetch_icons(&page).await;
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].props.size, ImageSize::new(512, 512));
        assert_eq!(resolved[1].url, small.url);
    }

    #[tokio::test]
    async fn test_fetch_icons_cache_read_failure_degrades_to_empty() {
        let fetcher =
            IconFetcher::with_stores(IconScraper::new(), Arc::new(BrokenStore), Arc::new(BrokenStore));
        let page = Url::parse("https://example.com/app").unwrap();

        let resolved = fetcher.fetch_icons(&page).await;
        assert!(resolved.is_empty(), "read-path failures must not surface");
    }

    #[tokio::test]
    async fn test_one_cache_hit() {
        let (fetcher, icon_store, _) = memory_fetcher();
        let cached = icon("https://example.com/a.png", "image/png", 16, 16);

        IconCache::new(icon_store as Arc<dyn KeyValueStore>)
            .store(std::slice::from_ref(&cached))
            .await
            .unwrap();

        let resolved = fetcher.one(&cached.url).await.unwrap();
        assert_eq!(resolved, Some(cached));
    }

    #[tokio::test]
    async fn test_one_storage_error_propagates() {
        let fetcher =
            IconFetcher::with_stores(IconScraper::new(), Arc::new(BrokenStore), Arc::new(BrokenStore));
        let url = Url::parse("https://example.com/a.png").unwrap();

        let result = fetcher.one(&url).await;
        assert!(
            matches!(result, Err(CacheError::Read { .. })),
            "storage failure must propagate, unlike a missing icon"
        );
    }

    #[tokio::test]
    async fn test_one_found_batch_without_url_skips_download() {
        // The host batch exists but lacks the requested URL: found=true, so
        // no download is attempted and the result is None.
        let (fetcher, icon_store, _) = memory_fetcher();

        IconCache::new(icon_store as Arc<dyn KeyValueStore>)
            .store(&[icon("https://example.com/other.png", "image/png", 16, 16)])
            .await
            .unwrap();

        let url = Url::parse("https://example.com/missing.png").unwrap();
        let resolved = fetcher.one(&url).await.unwrap();
        assert_eq!(resolved, None);
    }
}
