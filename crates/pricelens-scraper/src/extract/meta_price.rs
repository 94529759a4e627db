//! Price from dedicated price meta tags.

use crate::document::Document;
use crate::error::AccessorError;
use crate::locale::PriceLocale;
use crate::normalize::{normalize_price, NormalizedPrice};

const PRICE_META_SELECTORS: &[&str] = &[
    r#"meta[property="product:price:amount"]"#,
    r#"meta[property="og:price:amount"]"#,
    r#"meta[name="price"]"#,
    r#"meta[property="price"]"#,
    r#"meta[itemprop="price"]"#,
];

/// The first price meta `content` that contains a digit, normalized.
///
/// # Errors
///
/// Returns [`AccessorError`] if the document cannot be queried.
pub async fn extract_meta_price(
    document: &dyn Document,
    locale: &PriceLocale,
) -> Result<Option<NormalizedPrice>, AccessorError> {
    for selector in PRICE_META_SELECTORS {
        let metas = document.query_all(selector).await?;
        let content = metas.iter().find_map(|m| {
            m.attr_non_empty("content")
                .filter(|c| c.chars().any(|ch| ch.is_ascii_digit()))
        });
        if let Some(content) = content {
            tracing::debug!(selector, content, "price meta tag found");
            return Ok(normalize_price(content, locale));
        }
    }
    Ok(None)
}
