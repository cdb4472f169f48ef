//! Manifest icon descriptors and content-addressed versioning.
//!
//! The boundary layer serializes the web-app manifest; this module owns the
//! icon-facing parts: the `{src, type, sizes}` descriptor derived from a
//! resolved [`Icon`], the default descriptor substituted when a page yields
//! no icons at all, and the version token - a hash over the descriptor set,
//! order-independent, used for cache-busting query parameters and ETags.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::icon::Icon;

/// Descriptor served when a page yields no icons; the boundary layer hosts
/// the referenced asset.
const DEFAULT_ICON_SRC: &str = "/default-app-icon.png";

/// A manifest icon entry: `{"src": ..., "type": ..., "sizes": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconDescriptor {
    /// Path the icon is served under.
    pub src: String,

    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Size label in manifest form, e.g. `512x512`.
    pub sizes: String,
}

impl From<&Icon> for IconDescriptor {
    fn from(icon: &Icon) -> Self {
        Self {
            src: icon.served_path(),
            mime_type: icon.props.mime_type.clone(),
            sizes: icon.props.size.to_string(),
        }
    }
}

/// Substitutes the default 512x512 descriptor when `descriptors` is empty.
/// A manifest without icons is uninstallable; the default keeps the install
/// flow alive while the page's own icons remain undiscoverable.
#[must_use]
pub fn ensure_any_icon(descriptors: Vec<IconDescriptor>) -> Vec<IconDescriptor> {
    if !descriptors.is_empty() {
        return descriptors;
    }

    vec![IconDescriptor {
        src: DEFAULT_ICON_SRC.to_string(),
        mime_type: "image/png".to_string(),
        sizes: "512x512".to_string(),
    }]
}

/// Derives the version token for a descriptor set.
///
/// Descriptors are sorted by (src, type, sizes), each field is fed to a
/// SHA-256 hash in that order, and the digest is hex-encoded. The token
/// changes iff the descriptor *set* changes; ordering of the input is
/// irrelevant.
#[must_use]
pub fn manifest_version(descriptors: &[IconDescriptor]) -> String {
    let mut sorted: Vec<&IconDescriptor> = descriptors.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.src, &a.mime_type, &a.sizes).cmp(&(&b.src, &b.mime_type, &b.sizes))
    });

    let mut hasher = Sha256::new();
    for descriptor in sorted {
        hasher.update(descriptor.src.as_bytes());
        hasher.update(descriptor.mime_type.as_bytes());
        hasher.update(descriptor.sizes.as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Appends the version as a cache-busting query parameter: `?v=` when the
/// path has no query yet, `&v=` otherwise. An empty version returns the path
/// unchanged.
#[must_use]
pub fn versioned_manifest_href(manifest_path: &str, version: &str) -> String {
    if version.is_empty() {
        return manifest_path.to_string();
    }

    let separator = if manifest_path.contains('?') { '&' } else { '?' };
    format!("{manifest_path}{separator}v={version}")
}
