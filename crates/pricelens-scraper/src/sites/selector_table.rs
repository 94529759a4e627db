use async_trait::async_trait;
use pricelens_core::{ExtractionResult, Field, SiteSelectors};
use url::Url;

use super::SiteRule;
use crate::document::{Document, ElementSnapshot};
use crate::error::AccessorError;
use crate::extract::{clean_text, recover};
use crate::image::absolutize_url;
use crate::locale::PriceLocale;
use crate::normalize::normalize_price;

/// A retailer described entirely by ordered selector lists.
pub struct SelectorTableRule {
    site: SiteSelectors,
    locale: PriceLocale,
}

impl SelectorTableRule {
    #[must_use]
    pub fn new(site: SiteSelectors, locale: PriceLocale) -> Self {
        Self { site, locale }
    }

    /// First selector whose first match yields a value through `read`.
    ///
    /// A selector the document rejects is logged and skipped.
    async fn first_value<F>(
        &self,
        document: &dyn Document,
        selectors: &[String],
        read: F,
    ) -> Result<Option<String>, AccessorError>
    where
        F: Fn(&ElementSnapshot) -> Option<String> + Send + Sync,
    {
        for selector in selectors {
            let found = recover("site_selector", document.query_first(selector).await)?;
            if let Some(value) = found.as_ref().and_then(&read) {
                tracing::debug!(site = %self.site.name, selector = %selector, "selector matched");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl SiteRule for SelectorTableRule {
    fn name(&self) -> &str {
        &self.site.name
    }

    async fn extract(
        &self,
        document: &dyn Document,
        _url: &Url,
    ) -> Result<ExtractionResult, AccessorError> {
        let mut result = ExtractionResult::default();

        let title = self
            .first_value(document, &self.site.title, |el| {
                Some(clean_text(&el.text)).filter(|t| !t.is_empty())
            })
            .await?;
        result.fill(Field::Title, title);

        let locale = &self.locale;
        let price = self
            .first_value(document, &self.site.price, |el| {
                normalize_price(&el.text, locale).map(|p| p.display)
            })
            .await?;
        result.fill(Field::Price, price);

        let base = document.url().clone();
        let image = self
            .first_value(document, &self.site.image, |el| {
                el.attr_non_empty("src")
                    .or_else(|| el.attr_non_empty("data-src"))
                    .and_then(|src| absolutize_url(&base, src))
                    .map(|u| u.to_string())
            })
            .await?;
        result.fill(Field::ImageUrl, image);

        result.fill(Field::Brand, Some(self.site.name.clone()));
        Ok(result)
    }
}
