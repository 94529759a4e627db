//! Brand from brand-bearing markup, else from the site's domain.

use url::{Host, Url};

use super::clean_text;
use crate::document::Document;
use crate::error::AccessorError;

const BRAND_SELECTORS: &[&str] = &[
    r#"meta[name="brand"]"#,
    r#"meta[property="og:brand"]"#,
    "[data-brand]",
    r#"[class*="brand"]"#,
    r#"[id*="brand"]"#,
];

/// Second-level labels that sit under a country code, as in `com.tr` or
/// `co.uk`.
const SECOND_LEVEL_LABELS: &[&str] = &[
    "com", "co", "net", "org", "gov", "edu", "ac", "gen", "biz", "info", "web", "av", "bel", "k12",
    "ltd", "plc", "me", "ne", "or", "tv",
];

/// First brand-bearing element whose value is 2–49 characters.
///
/// The value is the element's `content`, else `data-brand`, else its text.
///
/// # Errors
///
/// Returns [`AccessorError`] if the document cannot be queried.
pub async fn extract_brand(document: &dyn Document) -> Result<Option<String>, AccessorError> {
    for selector in BRAND_SELECTORS {
        let found = document.query_all(selector).await?.iter().find_map(|el| {
            let value = el
                .attr_non_empty("content")
                .or_else(|| el.attr_non_empty("data-brand"))
                .map_or_else(|| clean_text(&el.text), str::to_string);
            (2..50).contains(&value.chars().count()).then_some(value)
        });
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

/// Capitalized leftmost label of the registrable domain, e.g. `Trendyol` for
/// `www.trendyol.com` and `Sarar` for `shop.sarar.com.tr`.
///
/// IP hosts and labels of two characters or fewer yield `None`.
#[must_use]
pub fn brand_from_domain(url: &Url) -> Option<String> {
    let Some(Host::Domain(host)) = url.host() else {
        return None;
    };
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();

    let label = match labels.as_slice() {
        [.., name, second, tld] if tld.len() == 2 && SECOND_LEVEL_LABELS.contains(second) => name,
        [.., name, _tld] => name,
        _ => return None,
    };

    if label.chars().count() <= 2 {
        return None;
    }
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;

    fn domain_brand(url: &str) -> Option<String> {
        brand_from_domain(&Url::parse(url).unwrap())
    }

    async fn markup_brand(markup: &str) -> Option<String> {
        let d = HtmlDocument::new(markup, Url::parse("https://shop.example.com/").unwrap());
        extract_brand(&d).await.unwrap()
    }

    #[test]
    fn domain_brand_simple() {
        assert_eq!(domain_brand("https://www.trendyol.com/p/1").as_deref(), Some("Trendyol"));
    }

    #[test]
    fn domain_brand_two_level_suffix() {
        assert_eq!(domain_brand("https://www.sarar.com.tr/x").as_deref(), Some("Sarar"));
        assert_eq!(domain_brand("https://shop.next.co.uk/").as_deref(), Some("Next"));
    }

    #[test]
    fn domain_brand_uses_registrable_label_not_subdomain() {
        assert_eq!(domain_brand("https://m.store.example.com/").as_deref(), Some("Example"));
    }

    #[test]
    fn domain_brand_rejects_short_labels_and_ips() {
        assert!(domain_brand("https://hm.com/").is_none());
        assert!(domain_brand("http://127.0.0.1:8080/product").is_none());
        assert!(domain_brand("http://[::1]/").is_none());
        assert!(domain_brand("http://localhost/").is_none());
    }

    #[tokio::test]
    async fn meta_brand_first() {
        let got = markup_brand(
            r#"<meta name="brand" content="Mavi"><div class="brand-name">Other</div>"#,
        )
        .await;
        assert_eq!(got.as_deref(), Some("Mavi"));
    }

    #[tokio::test]
    async fn data_brand_attribute_value() {
        let got = markup_brand(r#"<div data-brand="Koton">ignored text</div>"#).await;
        assert_eq!(got.as_deref(), Some("Koton"));
    }

    #[tokio::test]
    async fn class_match_uses_text_within_length() {
        let long = "x".repeat(60);
        let got = markup_brand(&format!(
            r#"<div class="brand-wrapper">{long}</div><span id="brand">  Defacto </span>"#
        ))
        .await;
        assert_eq!(got.as_deref(), Some("Defacto"));
    }

    #[tokio::test]
    async fn nothing_brand_like_is_none() {
        assert!(markup_brand("<p>Ürün</p>").await.is_none());
    }
}
