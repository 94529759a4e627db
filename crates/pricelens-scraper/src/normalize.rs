//! Price normalization: raw price text to a bounded value and its canonical
//! display form.
//!
//! Everything here is pure and infallible from the caller's point of view:
//! malformed or out-of-range input yields `None`.

use crate::locale::PriceLocale;

/// Exclusive upper bound for an accepted price. Anything at or above it is
/// almost certainly a postal code, an SKU, or a phone number fragment.
pub const MAX_PRICE: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPrice {
    pub value: f64,
    /// Canonical rendering, e.g. `"1.299,00 TL"`.
    pub display: String,
}

/// Normalizes the first price-like number in `raw`.
///
/// Accepts grouped (`1.299,00`, `1.299`) and plain (`1299,00`, `1299.00`,
/// `1299`) forms. Returns `None` when no number is found or the value falls
/// outside `0 < v < 100000`.
#[must_use]
pub fn normalize_price(raw: &str, locale: &PriceLocale) -> Option<NormalizedPrice> {
    let value = parse_price_value(raw, locale)?;
    if !is_within_bounds(value) {
        return None;
    }
    Some(NormalizedPrice {
        value,
        display: format_price(value, locale),
    })
}

/// Reads the first number in `text` as an `f64` without bounds checks.
///
/// Also the reverse parser for canonical display strings.
#[must_use]
pub fn parse_price_value(text: &str, locale: &PriceLocale) -> Option<f64> {
    let number = locale.find_number(text.trim())?;
    number_to_value(number.as_str(), locale)
}

#[must_use]
pub fn is_within_bounds(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value < MAX_PRICE
}

/// Renders `value` with two decimals, grouping the integer part when it is
/// at least 1000, followed by the locale suffix.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // bounded, positive input
pub fn format_price(value: f64, locale: &PriceLocale) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let integer_part = if whole >= 1000 {
        group_digits(&digits, locale.grouping_separator)
    } else {
        digits
    };

    format!(
        "{integer_part}{}{fraction:02}{}",
        locale.decimal_separator, locale.display_suffix
    )
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Converts a matched numeric substring to a locale-neutral value.
///
/// With a decimal separator present, everything after the last one is the
/// fraction. Without one, a trailing group of exactly three digits is a
/// thousands group (`1.299`), anything else is a decimal point (`199.90`).
fn number_to_value(number: &str, locale: &PriceLocale) -> Option<f64> {
    let g = locale.grouping_separator;
    let d = locale.decimal_separator;

    let neutral = if let Some((int_part, frac_part)) = number.rsplit_once(d) {
        format!("{}.{frac_part}", strip_separator(int_part, g))
    } else if let Some((int_part, last)) = number.rsplit_once(g) {
        if last.len() == 3 {
            strip_separator(number, g)
        } else {
            format!("{}.{last}", strip_separator(int_part, g))
        }
    } else {
        number.to_string()
    };

    neutral.parse::<f64>().ok()
}

fn strip_separator(s: &str, separator: char) -> String {
    s.chars().filter(|c| *c != separator).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
