//! Image prober: true MIME type and pixel dimensions from raw bytes.
//!
//! Decodes just enough of an image container to report dimensions - no pixel
//! data is ever decoded. Dispatch is by MIME substring: `x-icon` goes through
//! the ICO container decoder, `/svg` through an attribute/viewBox parse, and
//! everything else through format-guessed raster header decoding (PNG, WEBP,
//! JPEG, GIF).
//!
//! Probe failures are soft: callers drop the single icon and keep going.

use std::io::Cursor;
use std::sync::LazyLock;

use image::{ImageFormat, ImageReader};
use regex::Regex;
use thiserror::Error;

use crate::icon::{ImageProps, ImageSize};

/// Errors that can occur while probing image bytes.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Zero bytes were passed.
    #[error("empty image data")]
    EmptyInput,

    /// The container header could not be decoded into dimensions.
    #[error("failed to decode image dimensions ({mime_type}): {source}")]
    Decode {
        /// MIME type the decode was attempted under.
        mime_type: String,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The SVG root element carried no usable width/height or viewBox.
    #[error("failed to parse SVG dimensions: {detail}")]
    SvgDecode {
        /// What was missing or malformed.
        detail: String,
    },
}

/// Matches the opening `<svg ...>` tag; dimensions live in its attributes.
#[allow(clippy::expect_used)]
static SVG_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<svg\b[^>]*>").expect("SVG open-tag regex is valid") // Static pattern, safe to panic
});

/// Captures a `width="..."` attribute value.
#[allow(clippy::expect_used)]
static SVG_WIDTH_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bwidth\s*=\s*["']([^"']+)["']"#).expect("SVG width regex is valid") // Static pattern, safe to panic
});

/// Captures a `height="..."` attribute value.
#[allow(clippy::expect_used)]
static SVG_HEIGHT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bheight\s*=\s*["']([^"']+)["']"#).expect("SVG height regex is valid") // Static pattern, safe to panic
});

/// Captures the four `viewBox` numbers (min-x, min-y, width, height).
#[allow(clippy::expect_used)]
static SVG_VIEWBOX_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bviewBox\s*=\s*["']\s*[-\d.]+[\s,]+[-\d.]+[\s,]+([\d.]+)[\s,]+([\d.]+)\s*["']"#,
    )
    .expect("SVG viewBox regex is valid") // Static pattern, safe to panic
});

/// Probes image bytes for their true MIME type and pixel dimensions.
///
/// When `declared_mime` is empty the type is derived by content sniffing;
/// unsniffable bytes fall back to `application/octet-stream` (and then fail
/// the raster decode, surfacing as [`ProbeError::Decode`]).
///
/// # Errors
///
/// Returns [`ProbeError::EmptyInput`] for zero bytes, [`ProbeError::Decode`]
/// or [`ProbeError::SvgDecode`] when dimensions cannot be determined.
pub fn probe_image(bytes: &[u8], declared_mime: &str) -> Result<ImageProps, ProbeError> {
    if bytes.is_empty() {
        return Err(ProbeError::EmptyInput);
    }

    let mime_type = if declared_mime.is_empty() {
        sniff_mime_type(bytes)
            .unwrap_or("application/octet-stream")
            .to_string()
    } else {
        declared_mime.to_string()
    };

    let (width, height) = if mime_type.contains("x-icon") {
        ico_dimensions(bytes, &mime_type)?
    } else if mime_type.contains("/svg") {
        svg_dimensions(bytes)?
    } else {
        raster_dimensions(bytes, &mime_type)?
    };

    Ok(ImageProps {
        mime_type,
        size: ImageSize::new(width, height),
    })
}

/// Sniffs a MIME type from leading bytes.
///
/// Binary formats go through magic-number detection; SVG (a text format with
/// no magic number) is recognized by its root element. Returns `None` when
/// nothing matches.
#[must_use]
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if let Some(kind) = infer::get(bytes) {
        return Some(kind.mime_type());
    }
    if looks_like_svg(bytes) {
        return Some("image/svg+xml");
    }
    None
}

/// Recognizes SVG documents: `<svg` at the start, optionally behind an XML
/// declaration, doctype, or comments. Only the head of the input is examined.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start();
    trimmed.starts_with("<svg")
        || ((trimmed.starts_with("<?xml") || trimmed.starts_with("<!")) && text.contains("<svg"))
}

fn ico_dimensions(bytes: &[u8], mime_type: &str) -> Result<(u32, u32), ProbeError> {
    ImageReader::with_format(Cursor::new(bytes), ImageFormat::Ico)
        .into_dimensions()
        .map_err(|source| ProbeError::Decode {
            mime_type: mime_type.to_string(),
            source,
        })
}

fn raster_dimensions(bytes: &[u8], mime_type: &str) -> Result<(u32, u32), ProbeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|io_error| ProbeError::Decode {
            mime_type: mime_type.to_string(),
            source: image::ImageError::IoError(io_error),
        })?;

    reader
        .into_dimensions()
        .map_err(|source| ProbeError::Decode {
            mime_type: mime_type.to_string(),
            source,
        })
}

/// Extracts SVG dimensions from the root element: explicit width/height
/// attributes win, viewBox width/height are the fallback. Fractional values
/// are rounded to whole pixels.
fn svg_dimensions(bytes: &[u8]) -> Result<(u32, u32), ProbeError> {
    let text = String::from_utf8_lossy(bytes);
    let open_tag = SVG_OPEN_TAG
        .find(&text)
        .ok_or_else(|| ProbeError::SvgDecode {
            detail: "no <svg> root element".to_string(),
        })?
        .as_str();

    let width = SVG_WIDTH_ATTR
        .captures(open_tag)
        .and_then(|captures| parse_svg_length(&captures[1]));
    let height = SVG_HEIGHT_ATTR
        .captures(open_tag)
        .and_then(|captures| parse_svg_length(&captures[1]));

    if let (Some(width), Some(height)) = (width, height) {
        return Ok((width, height));
    }

    if let Some(captures) = SVG_VIEWBOX_ATTR.captures(open_tag) {
        let width = parse_svg_length(&captures[1]);
        let height = parse_svg_length(&captures[2]);
        if let (Some(width), Some(height)) = (width, height) {
            return Ok((width, height));
        }
    }

    Err(ProbeError::SvgDecode {
        detail: "no width/height attributes or viewBox".to_string(),
    })
}

/// Parses an SVG length value, tolerating a `px` suffix. Percentages and
/// other units carry no pixel size and yield `None`.
fn parse_svg_length(value: &str) -> Option<u32> {
    let numeric = value.trim().trim_end_matches("px").trim();
    let parsed: f64 = numeric.parse().ok()?;
    if parsed.is_sign_negative() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(parsed.round() as u32)
}
