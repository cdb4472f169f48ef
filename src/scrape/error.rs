//! Error types for icon discovery and download.
//!
//! Every variant carries the URL it happened on: scrape failures surface in
//! logs far from the request that caused them, and the URL is the only
//! stable correlation key.

use thiserror::Error;

use crate::probe::ProbeError;

/// Errors that can occur while scraping a page or downloading an icon.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network-level failure fetching a page or icon (DNS, connect, TLS,
    /// body read).
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        /// The URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// An icon response arrived with a non-200 status.
    #[error("failed to fetch icon {url}, status: {status}")]
    HttpStatus {
        /// The icon URL.
        url: String,
        /// The HTTP status code received.
        status: u16,
    },

    /// The response body is not an image and does not sniff as one.
    #[error("invalid icon content type for {url}: {content_type} (detected: {detected})")]
    InvalidContentType {
        /// The icon URL.
        url: String,
        /// The Content-Type the server declared.
        content_type: String,
        /// What content sniffing made of the body.
        detected: String,
    },

    /// The image prober could not determine dimensions.
    #[error("failed to probe icon {url}: {source}")]
    Probe {
        /// The icon URL.
        url: String,
        /// The underlying probe error.
        #[source]
        source: ProbeError,
    },
}

impl ScrapeError {
    /// Creates a fetch error from a transport failure.
    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.into(),
            source,
        }
    }

    /// Creates a non-200 status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid-content-type error.
    pub fn invalid_content_type(
        url: impl Into<String>,
        content_type: impl Into<String>,
        detected: impl Into<String>,
    ) -> Self {
        Self::InvalidContentType {
            url: url.into(),
            content_type: content_type.into(),
            detected: detected.into(),
        }
    }

    /// Creates a probe error wrapper.
    pub fn probe(url: impl Into<String>, source: ProbeError) -> Self {
        Self::Probe {
            url: url.into(),
            source,
        }
    }
}
