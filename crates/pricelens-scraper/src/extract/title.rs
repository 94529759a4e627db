//! Title from page headings and the document title.

use super::clean_text;
use crate::document::Document;
use crate::error::AccessorError;

const MIN_HEADING_CHARS: usize = 3;
const MAX_HEADING_CHARS: usize = 200;

/// First `h1` of 3–200 characters, else the `<title>`, else the first `h2`
/// of 3–200 characters.
///
/// # Errors
///
/// Returns [`AccessorError`] if the document cannot be queried.
pub async fn extract_title(document: &dyn Document) -> Result<Option<String>, AccessorError> {
    if let Some(h1) = first_heading(document, "h1").await? {
        return Ok(Some(h1));
    }

    let title = document
        .query_all("title")
        .await?
        .iter()
        .map(|t| clean_text(&t.text))
        .find(|t| !t.is_empty());
    if title.is_some() {
        return Ok(title);
    }

    first_heading(document, "h2").await
}

async fn first_heading(
    document: &dyn Document,
    tag: &str,
) -> Result<Option<String>, AccessorError> {
    Ok(document
        .query_all(tag)
        .await?
        .iter()
        .map(|h| clean_text(&h.text))
        .find(|h| (MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&h.chars().count())))
}
