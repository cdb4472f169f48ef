//! Domain types for discovered icon assets.
//!
//! An [`Icon`] is an image asset discovered for a page: its source URL, the
//! raw bytes, and probed image properties. Two icons are the same icon iff
//! their source URLs render to the identical string; bytes and declared size
//! are not part of identity. Records are never mutated after creation -
//! cache updates are whole-record replacements.
//!
//! The serde representation reproduces the persisted cache format exactly:
//! `{"URL": "...", "Body": "<base64>", "Props": {"MimeType": "...",
//! "Size": {"Width": N, "Height": N}}}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// A discovered icon asset (URL + bytes + probed properties).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Source URL the icon was (or can be) downloaded from. Identity key.
    #[serde(rename = "URL")]
    pub url: Url,

    /// Raw byte payload. May be empty when only metadata is known.
    #[serde(rename = "Body", with = "base64_body")]
    pub body: Vec<u8>,

    /// MIME type and pixel dimensions.
    #[serde(rename = "Props")]
    pub props: ImageProps,
}

impl Icon {
    /// Path this icon is served under by the boundary layer:
    /// `/i/host[:port]/path[?query]`.
    #[must_use]
    pub fn served_path(&self) -> String {
        let mut path = String::from("/i/");
        if let Some(host) = self.url.host_str() {
            path.push_str(host);
        }
        if let Some(port) = self.url.port() {
            path.push(':');
            path.push_str(&port.to_string());
        }
        path.push_str(self.url.path());
        if let Some(query) = self.url.query() {
            path.push('?');
            path.push_str(query);
        }
        path
    }
}

/// Probed image properties: MIME type and pixel size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageProps {
    /// MIME type, e.g. `image/png`. Empty when unknown.
    #[serde(rename = "MimeType")]
    pub mime_type: String,

    /// Pixel dimensions. Zero when unknown.
    #[serde(rename = "Size")]
    pub size: ImageSize,
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    #[serde(rename = "Width")]
    pub width: u32,

    /// Height in pixels.
    #[serde(rename = "Height")]
    pub height: u32,
}

impl ImageSize {
    /// Creates a size from width and height.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel area, used for resizing-candidate selection.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for ImageSize {
    /// Renders as the manifest `sizes` form, e.g. `512x512`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Serde adapter encoding icon bodies as base64 strings, matching the
/// persisted cache format. Absent or null bodies decode to empty.
mod base64_body {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?;
        match encoded {
            Some(encoded) => STANDARD.decode(&encoded).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn icon(url: &str, body: &[u8], mime: &str, width: u32, height: u32) -> Icon {
        Icon {
            url: Url::parse(url).unwrap(),
            body: body.to_vec(),
            props: ImageProps {
                mime_type: mime.to_string(),
                size: ImageSize::new(width, height),
            },
        }
    }

    #[test]
    fn test_served_path_plain() {
        let icon = icon("https://example.com/favicon.ico", b"", "image/x-icon", 0, 0);
        assert_eq!(icon.served_path(), "/i/example.com/favicon.ico");
    }

    #[test]
    fn test_served_path_with_port_and_query() {
        let icon = icon(
            "http://example.com:8080/icons/app.png?v=3",
            b"",
            "image/png",
            0,
            0,
        );
        assert_eq!(icon.served_path(), "/i/example.com:8080/icons/app.png?v=3");
    }

    #[test]
    fn test_image_size_display() {
        assert_eq!(ImageSize::new(512, 512).to_string(), "512x512");
        assert_eq!(ImageSize::default().to_string(), "0x0");
    }

    #[test]
    fn test_image_size_area() {
        assert_eq!(ImageSize::new(16, 16).area(), 256);
        assert_eq!(ImageSize::new(0, 100).area(), 0);
    }

    #[test]
    fn test_persisted_json_field_names() {
        let icon = icon("https://example.com/a.png", b"abc", "image/png", 16, 32);
        let json = serde_json::to_value(&icon).unwrap();
        assert_eq!(json["URL"], "https://example.com/a.png");
        assert_eq!(json["Body"], "YWJj"); // base64("abc")
        assert_eq!(json["Props"]["MimeType"], "image/png");
        assert_eq!(json["Props"]["Size"]["Width"], 16);
        assert_eq!(json["Props"]["Size"]["Height"], 32);
    }

    #[test]
    fn test_json_round_trip() {
        let original = icon("https://example.com/a.svg", b"<svg/>", "image/svg+xml", 10, 10);
        let encoded = serde_json::to_vec(&original).unwrap();
        let decoded: Icon = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_null_body_decodes_to_empty() {
        let decoded: Icon = serde_json::from_str(
            r#"{"URL":"https://example.com/a.png","Body":null,"Props":{"MimeType":"","Size":{"Width":0,"Height":0}}}"#,
        )
        .unwrap();
        assert!(decoded.body.is_empty());
    }
}
