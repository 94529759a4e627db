//! DOM price path: score every currency-bearing element, then disambiguate.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::{select_by_priority, PriceCandidate};
use crate::document::{Document, ElementSnapshot, Viewport};
use crate::error::AccessorError;
use crate::locale::PriceLocale;
use crate::normalize::{format_price, is_within_bounds, parse_price_value};

const VISIBLE_SCORE: u32 = 10;
const UPPER_HALF_SCORE: u32 = 5;
const KEYWORD_SCORE: u32 = 15;
const LEADING_MARKER_SCORE: u32 = 5;

/// Selectors from most to least price-specific, with their specificity
/// bonus.
const PRICE_SELECTORS: &[(&str, u32)] = &[
    ("[data-price]", 20),
    (r#"[data-testid*="price"]"#, 15),
    (r#"[class*="price"]"#, 10),
    (r#"[id*="price"]"#, 0),
    (r#"[data-qa*="price"]"#, 0),
    ("span", 0),
    ("div", 0),
    ("p", 0),
    ("strong", 0),
    ("b", 0),
];

/// Best price among the page's currency-bearing elements, in canonical form.
///
/// A selector that fails to parse or evaluate is skipped; only a fatal
/// accessor error aborts the path.
///
/// # Errors
///
/// Returns [`AccessorError`] when the document becomes unavailable.
pub async fn extract_dom_price(
    document: &dyn Document,
    locale: &PriceLocale,
) -> Result<Option<String>, AccessorError> {
    let viewport = document.viewport();
    // node id -> (first-seen order, candidate with its best score)
    let mut by_node: HashMap<usize, (usize, PriceCandidate)> = HashMap::new();

    for (selector, specificity) in PRICE_SELECTORS {
        let elements = match document.query_all(selector).await {
            Ok(elements) => elements,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::debug!(selector, error = %e, "price selector failed; skipping");
                continue;
            }
        };

        for element in &elements {
            let Some(candidate) = score_element(element, selector, *specificity, viewport, locale)
            else {
                continue;
            };
            let next_order = by_node.len();
            match by_node.entry(element.node_id) {
                Entry::Occupied(mut slot) => {
                    if candidate.priority > slot.get().1.priority {
                        slot.get_mut().1 = candidate;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert((next_order, candidate));
                }
            }
        }
    }

    let mut candidates: Vec<(usize, PriceCandidate)> = by_node.into_values().collect();
    candidates.sort_by_key(|(order, _)| *order);
    tracing::debug!(count = candidates.len(), "dom price candidates collected");

    Ok(select_by_priority(candidates.into_iter().map(|(_, c)| c).collect())
        .map(|picked| format_price(picked.value, locale)))
}

/// Scores one element, or `None` when it carries no bounded price.
pub(crate) fn score_element(
    element: &ElementSnapshot,
    selector: &str,
    specificity: u32,
    viewport: Viewport,
    locale: &PriceLocale,
) -> Option<PriceCandidate> {
    let text = element.trimmed_text();
    if text.is_empty() || !locale.contains_currency_marker(text) {
        return None;
    }
    let value = parse_price_value(text, locale).filter(|v| is_within_bounds(*v))?;

    let mut priority = specificity;
    if element.visible {
        priority += VISIBLE_SCORE;
    }
    if element
        .bounds
        .is_some_and(|b| b.top < f64::from(viewport.height) / 2.0)
    {
        priority += UPPER_HALF_SCORE;
    }
    if element
        .parent_text
        .as_deref()
        .is_some_and(|t| locale.contains_price_keyword(t))
    {
        priority += KEYWORD_SCORE;
    }
    if locale.starts_with_currency_marker(text) {
        priority += LEADING_MARKER_SCORE;
    }

    Some(PriceCandidate {
        raw_text: text.to_string(),
        value,
        priority,
        source_selector: selector.to_string(),
    })
}

#[cfg(test)]
#[path = "dom_test.rs"]
mod tests;
