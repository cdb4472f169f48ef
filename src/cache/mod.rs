//! Two-tier cache-aside storage for the icon pipeline.
//!
//! - [`IconCache`]: registrable host → deduplicated, sorted batch of icon
//!   records with bytes.
//! - [`LinkCache`]: normalized page key → ordered, deduplicated list of icon
//!   URLs discovered for that page.
//!
//! Both sit on the [`crate::kv::KeyValueStore`] collaborator and use
//! read-merge-write updates with no transactional isolation; a lost merge
//! under concurrent writers is an accepted trade-off because every cached
//! value is re-derivable from the network.

mod error;
mod icons;
mod links;

pub use error::CacheError;
pub use icons::IconCache;
pub use links::LinkCache;
