//! Social-preview meta tags (Open Graph, Twitter cards, product brand).

use super::meta_content;
use crate::document::Document;
use crate::error::AccessorError;

const TITLE_KEYS: &[&str] = &["og:title", "twitter:title"];
const IMAGE_KEYS: &[&str] = &["og:image", "twitter:image"];
const BRAND_KEYS: &[&str] = &["brand", "og:brand", "product:brand"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialPreview {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub brand: Option<String>,
}

/// Reads the preview tags; `None` unless at least one field was found.
///
/// # Errors
///
/// Returns [`AccessorError`] if the document cannot be queried.
pub async fn extract_social_preview(
    document: &dyn Document,
) -> Result<Option<SocialPreview>, AccessorError> {
    let preview = SocialPreview {
        title: first_meta(document, TITLE_KEYS).await?,
        image_url: first_meta(document, IMAGE_KEYS).await?,
        brand: first_meta(document, BRAND_KEYS).await?,
    };

    if preview == SocialPreview::default() {
        return Ok(None);
    }
    Ok(Some(preview))
}

async fn first_meta(
    document: &dyn Document,
    keys: &[&str],
) -> Result<Option<String>, AccessorError> {
    for key in keys {
        if let Some(content) = meta_content(document, key).await? {
            return Ok(Some(content));
        }
    }
    Ok(None)
}
