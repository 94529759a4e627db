//! Locale conventions used to read and render prices.

use regex::Regex;

/// Separator, currency and keyword conventions for one market.
///
/// Every price regex the pipeline uses is compiled once here from the
/// separators and markers, so a locale can be built once and shared by
/// reference across concurrent scrapes.
#[derive(Debug, Clone)]
pub struct PriceLocale {
    pub grouping_separator: char,
    pub decimal_separator: char,
    /// Appended to every rendered price, e.g. `" TL"`.
    pub display_suffix: String,
    /// Markers whose presence marks text as price-bearing, in match order.
    pub currency_markers: Vec<String>,
    /// Words whose presence near a candidate suggests it is the selling price.
    pub price_keywords: Vec<String>,
    grouped_fragment: String,
    plain_fragment: String,
    number_re: Regex,
    keyword_re: Regex,
}

impl PriceLocale {
    /// Builds a locale and compiles its patterns. Separators, markers and
    /// keywords are escaped before they are spliced into a pattern.
    #[must_use]
    pub fn new(
        grouping_separator: char,
        decimal_separator: char,
        display_suffix: &str,
        currency_markers: &[&str],
        price_keywords: &[&str],
    ) -> Self {
        let g = regex::escape(&grouping_separator.to_string());
        let d = regex::escape(&decimal_separator.to_string());

        // `1.234,56` or `1.234`; the grouped form needs at least one group
        // or an explicit decimal part so bare integers fall through to plain.
        let grouped_fragment = format!(r"\d{{1,3}}(?:{g}\d{{3}})*{d}\d{{2}}|\d{{1,3}}(?:{g}\d{{3}})+");
        let plain_fragment = format!(r"\d+(?:[{g}{d}]\d{{2}})?");
        let number_re = Regex::new(&format!(
            r"{grouped_fragment}|\d+(?:[{g}{d}]\d{{1,2}})?"
        ))
        .expect("valid price regex");

        let keywords = price_keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let keyword_re = Regex::new(&format!("(?i)(?:{keywords})")).expect("valid keyword regex");

        Self {
            grouping_separator,
            decimal_separator,
            display_suffix: display_suffix.to_string(),
            currency_markers: currency_markers.iter().map(|m| (*m).to_string()).collect(),
            price_keywords: price_keywords.iter().map(|k| (*k).to_string()).collect(),
            grouped_fragment,
            plain_fragment,
            number_re,
            keyword_re,
        }
    }

    /// Turkish lira: `1.299,00 TL`.
    #[must_use]
    pub fn turkish() -> Self {
        Self::new(
            '.',
            ',',
            " TL",
            &["₺", "TL", "TRY"],
            &["satış", "indirimli", "fiyat", "price", "sale", "discount"],
        )
    }

    /// First numeric substring in `text`, grouped form preferred.
    pub(crate) fn find_number<'t>(&self, text: &'t str) -> Option<regex::Match<'t>> {
        self.number_re.find(text)
    }

    pub(crate) fn grouped_fragment(&self) -> &str {
        &self.grouped_fragment
    }

    pub(crate) fn plain_fragment(&self) -> &str {
        &self.plain_fragment
    }

    #[must_use]
    pub fn contains_currency_marker(&self, text: &str) -> bool {
        self.currency_markers.iter().any(|m| text.contains(m.as_str()))
    }

    #[must_use]
    pub fn starts_with_currency_marker(&self, text: &str) -> bool {
        self.currency_markers
            .iter()
            .any(|m| text.starts_with(m.as_str()))
    }

    #[must_use]
    pub fn contains_price_keyword(&self, text: &str) -> bool {
        self.keyword_re.is_match(text)
    }
}

impl Default for PriceLocale {
    fn default() -> Self {
        Self::turkish()
    }
}
