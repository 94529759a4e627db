//! Product image selection: gather every `<img>`, score by pixel area, keep
//! the largest.

use url::Url;

use crate::document::{Document, ElementSnapshot};
use crate::error::AccessorError;

/// Images smaller than 100×100 are icons, logos, or tracking pixels.
pub const MIN_IMAGE_AREA: u64 = 10_000;

/// Source attributes in lookup order; lazy loaders park the real URL in the
/// `data-*` variants.
const SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy", "data-original", "data-lazy-src"];

const RASTER_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub area: u64,
    pub alt_text: String,
}

/// Largest raster image on the page, if it clears [`MIN_IMAGE_AREA`].
///
/// # Errors
///
/// Returns [`AccessorError`] if the document cannot be queried.
pub async fn extract_image(document: &dyn Document) -> Result<Option<String>, AccessorError> {
    let images = document.query_all("img").await?;
    let candidates = collect_image_candidates(&images, document.url());
    tracing::debug!(count = candidates.len(), "image candidates collected");
    Ok(select_image(candidates).map(|c| c.url))
}

#[must_use]
pub fn collect_image_candidates(images: &[ElementSnapshot], base: &Url) -> Vec<ImageCandidate> {
    images
        .iter()
        .filter_map(|img| {
            let url = image_source(img, base)?;
            if !has_raster_extension(&url) {
                return None;
            }
            let (width, height) = image_dimensions(img);
            Some(ImageCandidate {
                url: url.to_string(),
                width,
                height,
                area: u64::from(width) * u64::from(height),
                alt_text: img.attr("alt").unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

/// Maximum-area candidate (earliest on ties), rejected below
/// [`MIN_IMAGE_AREA`].
#[must_use]
pub fn select_image(candidates: Vec<ImageCandidate>) -> Option<ImageCandidate> {
    let mut best: Option<ImageCandidate> = None;
    for candidate in candidates {
        if best.as_ref().map_or(true, |b| candidate.area > b.area) {
            best = Some(candidate);
        }
    }
    best.filter(|b| b.area >= MIN_IMAGE_AREA)
}

/// First non-empty source attribute, resolved against `base`.
///
/// Handles protocol-relative (`//cdn…`), root-relative and
/// document-relative sources.
#[must_use]
pub fn image_source(img: &ElementSnapshot, base: &Url) -> Option<Url> {
    let raw = SOURCE_ATTRS.iter().find_map(|a| img.attr_non_empty(a))?;
    absolutize_url(base, raw)
}

pub(crate) fn absolutize_url(base: &Url, candidate: &str) -> Option<Url> {
    let candidate = candidate.replace("&amp;", "&");
    base.join(&candidate).ok()
}

/// Natural size, else declared `width`/`height` attributes, else the
/// rendered box, else zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // rendered sizes are small and non-negative
pub fn image_dimensions(img: &ElementSnapshot) -> (u32, u32) {
    if let Some((w, h)) = img.natural_size.filter(|(w, h)| *w > 0 && *h > 0) {
        return (w, h);
    }
    let declared = |name: &str| {
        img.attr(name)
            .and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok())
            .filter(|v| *v > 0)
    };
    if let (Some(w), Some(h)) = (declared("width"), declared("height")) {
        return (w, h);
    }
    if let Some(b) = img.bounds.filter(|b| b.has_area()) {
        return (b.width.round() as u32, b.height.round() as u32);
    }
    (0, 0)
}

fn has_raster_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    RASTER_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
