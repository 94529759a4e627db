//! Last-resort price search over the raw rendered markup.

use std::collections::HashSet;

use regex::Regex;

use super::{closest_to_mean, PriceCandidate};
use crate::document::Document;
use crate::error::AccessorError;
use crate::locale::PriceLocale;
use crate::normalize::{format_price, is_within_bounds, parse_price_value};

/// The twelve currency patterns for `locale`, in match order: each marker
/// prefixed then suffixed, each with the grouped then the plain number form.
///
/// Alphabetic markers are anchored on their outer word boundary so `HTML 5`
/// never reads as a price.
#[must_use]
pub fn raw_price_patterns(locale: &PriceLocale) -> Vec<Regex> {
    let mut patterns = Vec::new();
    for marker in &locale.currency_markers {
        let escaped = regex::escape(marker);
        let alphabetic = marker.chars().all(char::is_alphabetic);
        let (before, after) = if alphabetic {
            (format!(r"\b{escaped}"), format!(r"{escaped}\b"))
        } else {
            (escaped.clone(), escaped)
        };

        let numbers = [locale.grouped_fragment(), locale.plain_fragment()];
        for number in numbers {
            patterns.push(format!(r"{before}\s*({number})"));
        }
        for number in numbers {
            patterns.push(format!(r"({number})\s*{after}"));
        }
    }
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid raw price regex"))
        .collect()
}

/// Scans the page markup for currency-marked numbers and picks the one
/// nearest the mean of all matches.
///
/// # Errors
///
/// Returns [`AccessorError`] if the markup cannot be read.
pub async fn extract_raw_text_price(
    document: &dyn Document,
    patterns: &[Regex],
    locale: &PriceLocale,
) -> Result<Option<String>, AccessorError> {
    let content = document.content().await?;
    Ok(select_raw_price(&content, patterns, locale).map(|c| format_price(c.value, locale)))
}

/// Pure selection over `text`; see [`extract_raw_text_price`].
#[must_use]
pub fn select_raw_price(
    text: &str,
    patterns: &[Regex],
    locale: &PriceLocale,
) -> Option<PriceCandidate> {
    let mut seen_spans = HashSet::new();
    let mut candidates = Vec::new();

    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            let Some(number) = caps.get(1) else {
                continue;
            };
            if is_partial_number(text, number.start(), number.end(), locale)
                || !seen_spans.insert((number.start(), number.end()))
            {
                continue;
            }
            let Some(value) = parse_price_value(number.as_str(), locale) else {
                continue;
            };
            if !is_within_bounds(value) {
                continue;
            }
            candidates.push(PriceCandidate {
                raw_text: caps.get(0).map_or("", |m| m.as_str()).to_string(),
                value,
                priority: 0,
                source_selector: pattern.as_str().to_string(),
            });
        }
    }

    tracing::debug!(count = candidates.len(), "raw text price candidates collected");
    candidates.sort_by(|a, b| a.value.total_cmp(&b.value));
    closest_to_mean(candidates)
}

/// `true` when the matched span is the head or tail of a longer number,
/// e.g. `299,00` inside `1.299,00`.
fn is_partial_number(text: &str, start: usize, end: usize, locale: &PriceLocale) -> bool {
    let is_sep = |c: char| c == locale.grouping_separator || c == locale.decimal_separator;

    let mut before = text[..start].chars().rev();
    let extends_left = match before.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some(c) if is_sep(c) => before.next().is_some_and(|d| d.is_ascii_digit()),
        _ => false,
    };

    let mut after = text[end..].chars();
    let extends_right = match after.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some(c) if is_sep(c) => after.next().is_some_and(|d| d.is_ascii_digit()),
        _ => false,
    };

    extends_left || extends_right
}
