//! Canonicalization: normalize MIME types and guarantee a 512x512 variant.
//!
//! Install prompts require a 512x512 manifest icon. Rather than transcode
//! pixels, canonicalization appends one synthetic entry that relabels an
//! existing icon's bytes as the 512x512 slot. Vector sources scale
//! losslessly, so the first SVG is preferred; the raster fallback picks the
//! smallest image - cheapest to claim as scaled - trading fidelity for
//! bandwidth.

use crate::icon::{Icon, ImageProps, ImageSize};
use crate::probe;

/// Edge length of the guaranteed big-icon slot.
const BIG_ICON_EDGE: u32 = 512;

/// Produces the canonical icon set: every icon MIME-normalized, plus one
/// synthetic 512x512 entry unless an exact 512x512 icon already exists.
///
/// An empty input stays empty; a non-empty input always yields at least one
/// 512x512-labeled entry.
pub(crate) fn ensure_big_icon(icons: Vec<Icon>) -> Vec<Icon> {
    if icons.is_empty() {
        return icons;
    }

    let mut normalized: Vec<Icon> = icons.into_iter().map(normalize_icon).collect();

    if contains_exact_size(&normalized, BIG_ICON_EDGE, BIG_ICON_EDGE) {
        return normalized;
    }

    let Some(candidate) = pick_resizing_candidate(&normalized) else {
        return normalized;
    };

    let synthetic = Icon {
        url: candidate.url.clone(),
        body: candidate.body.clone(),
        props: ImageProps {
            mime_type: candidate.props.mime_type.clone(),
            size: ImageSize::new(BIG_ICON_EDGE, BIG_ICON_EDGE),
        },
    };
    normalized.push(synthetic);
    normalized
}

/// Fills a blank MIME type by sniffing the bytes. Unsniffable bytes get
/// `application/octet-stream` so canonical records never carry a blank type.
fn normalize_icon(mut icon: Icon) -> Icon {
    if icon.props.mime_type.is_empty() && !icon.body.is_empty() {
        icon.props.mime_type = probe::sniff_mime_type(&icon.body)
            .unwrap_or("application/octet-stream")
            .to_string();
    }
    icon
}

fn contains_exact_size(icons: &[Icon], width: u32, height: u32) -> bool {
    icons
        .iter()
        .any(|icon| icon.props.size.width == width && icon.props.size.height == height)
}

/// Selects the icon whose bytes back the synthetic 512x512 entry: the first
/// SVG in input order, else the smallest by pixel area. Area ties keep input
/// order (stable sort), so repeated runs pick the same icon.
fn pick_resizing_candidate(icons: &[Icon]) -> Option<&Icon> {
    if let Some(svg) = icons
        .iter()
        .find(|icon| icon.props.mime_type.contains("svg"))
    {
        return Some(svg);
    }

    let mut by_area: Vec<&Icon> = icons.iter().collect();
    by_area.sort_by_key(|icon| icon.props.size.area());
    by_area.first().copied()
}
