//! Icon resolution and caching pipeline.
//!
//! This library turns an arbitrary web page into the icon set an installable
//! app needs: it discovers the page's icon assets, downloads and classifies
//! them, caches everything in a two-tier store, and produces a canonical
//! icon set guaranteed to contain a 512x512 variant, with a stable
//! content-addressed version token for cache busting.
//!
//! # Architecture
//!
//! - [`icon`] - domain types (`Icon`, `ImageProps`, `ImageSize`)
//! - [`probe`] - image format/size introspection (ICO, SVG, raster)
//! - [`scrape`] - icon-URL discovery and concurrent icon download
//! - [`cache`] - host-keyed icon cache and page-keyed link cache
//! - [`fetcher`] - the orchestrator and canonicalization algorithm
//! - [`manifest`] - manifest icon descriptors and versioning
//! - [`kv`] - key-value storage contract and in-memory backend
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pwaify_core::{IconFetcher, IconScraper, MemoryStore};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = IconFetcher::with_stores(
//!     IconScraper::new(),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(MemoryStore::new()),
//! );
//! let page = Url::parse("https://example.com/")?;
//! let icons = fetcher.fetch_icons(&page).await;
//! println!("resolved {} icon variants", icons.len());
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod fetcher;
pub mod icon;
pub mod kv;
pub mod manifest;
pub mod probe;
pub mod scrape;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use cache::{CacheError, IconCache, LinkCache};
pub use fetcher::IconFetcher;
pub use icon::{Icon, ImageProps, ImageSize};
pub use kv::{KeyValueStore, MemoryStore, StoreError};
pub use manifest::{IconDescriptor, ensure_any_icon, manifest_version, versioned_manifest_href};
pub use probe::{ProbeError, probe_image, sniff_mime_type};
pub use scrape::{IconScraper, ScrapeError};
