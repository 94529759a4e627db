//! Candidate extractors: each pulls one or more fields from one kind of page
//! signal.
//!
//! Extractors return `Ok(None)` when their signal is missing or unusable and
//! only surface [`AccessorError`]s; the orchestrator decides which of those
//! end the scrape.

pub mod brand;
pub mod jsonld;
pub mod meta_price;
pub mod social;
pub mod title;

use std::sync::LazyLock;

use pricelens_core::{ExtractionResult, StructuredProductRecord};
use regex::Regex;

use crate::document::Document;
use crate::error::AccessorError;
use crate::locale::PriceLocale;
use crate::normalize::normalize_price;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Collapses runs of whitespace to single spaces and trims the ends.
#[must_use]
pub fn clean_text(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// `content` of the first `meta[property=key]`, else `meta[name=key]`,
/// trimmed and non-empty.
///
/// # Errors
///
/// Returns [`AccessorError`] if the document cannot be queried.
pub async fn meta_content(
    document: &dyn Document,
    key: &str,
) -> Result<Option<String>, AccessorError> {
    for attr in ["property", "name"] {
        let selector = format!(r#"meta[{attr}="{key}"]"#);
        let found = document
            .query_all(&selector)
            .await?
            .iter()
            .find_map(|m| m.attr_non_empty("content").map(str::to_string));
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

/// Scalar JSON value as text: trimmed non-empty strings and numbers.
pub(crate) fn json_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A structured record as a partial result, with its price normalized.
pub(crate) fn record_result(
    record: StructuredProductRecord,
    locale: &PriceLocale,
) -> ExtractionResult {
    ExtractionResult {
        title: record.name,
        price: record
            .price
            .and_then(|p| normalize_price(&p, locale))
            .map(|p| p.display),
        brand: record.brand,
        image_url: record.image_url,
        error: None,
    }
}

/// Downgrades a non-fatal accessor error to "nothing found", logging it.
///
/// Fatal errors pass through untouched so the caller can abort the scrape.
pub(crate) fn recover<T>(
    strategy: &'static str,
    outcome: Result<Option<T>, AccessorError>,
) -> Result<Option<T>, AccessorError> {
    match outcome {
        Ok(found) => {
            if found.is_none() {
                tracing::debug!(strategy, "strategy found nothing");
            }
            Ok(found)
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::debug!(strategy, error = %e, "strategy failed; continuing");
            Ok(None)
        }
    }
}
