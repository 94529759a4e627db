//! The generic extraction cascade for hosts without a dedicated rule.

use async_trait::async_trait;
use pricelens_core::{ExtractionResult, Field};
use regex::Regex;
use url::Url;

use crate::document::Document;
use crate::error::AccessorError;
use crate::extract::{brand, jsonld, meta_price, record_result, recover, social, title};
use crate::image::extract_image;
use crate::locale::PriceLocale;
use crate::price::{extract_dom_price, extract_raw_text_price, raw::raw_price_patterns};
use crate::sites::SiteRule;

/// Runs every strategy in fixed order, each filling only fields that are
/// still missing:
///
/// 1. structured data
/// 2. social-preview tags (when title or image is missing)
/// 3. price: meta tags, then the DOM disambiguator, then a raw-text scan
/// 4. image selector
/// 5. heading/title fallback
/// 6. brand markup, then the domain name
pub struct GenericRule {
    locale: PriceLocale,
    raw_patterns: Vec<Regex>,
}

impl GenericRule {
    #[must_use]
    pub fn new(locale: PriceLocale) -> Self {
        let raw_patterns = raw_price_patterns(&locale);
        Self {
            locale,
            raw_patterns,
        }
    }

    #[must_use]
    pub fn locale(&self) -> &PriceLocale {
        &self.locale
    }

    async fn fill_price(
        &self,
        document: &dyn Document,
        result: &mut ExtractionResult,
    ) -> Result<(), AccessorError> {
        let meta = recover(
            "meta_price",
            meta_price::extract_meta_price(document, &self.locale).await,
        )?;
        if result.fill(Field::Price, meta.map(|p| p.display)) {
            return Ok(());
        }

        let dom = recover(
            "dom_price",
            extract_dom_price(document, &self.locale).await,
        )?;
        if result.fill(Field::Price, dom) {
            return Ok(());
        }

        let raw = recover(
            "raw_text_price",
            extract_raw_text_price(document, &self.raw_patterns, &self.locale).await,
        )?;
        result.fill(Field::Price, raw);
        Ok(())
    }
}

impl Default for GenericRule {
    fn default() -> Self {
        Self::new(PriceLocale::turkish())
    }
}

#[async_trait]
impl SiteRule for GenericRule {
    fn name(&self) -> &str {
        "generic"
    }

    async fn extract(
        &self,
        document: &dyn Document,
        url: &Url,
    ) -> Result<ExtractionResult, AccessorError> {
        let mut result = ExtractionResult::default();

        if let Some(record) = recover(
            "structured_data",
            jsonld::extract_structured_product(document).await,
        )? {
            result.fill_missing(record_result(record, &self.locale));
        }

        if result.is_missing(Field::Title) || result.is_missing(Field::ImageUrl) {
            if let Some(preview) = recover(
                "social_preview",
                social::extract_social_preview(document).await,
            )? {
                result.fill(Field::Title, preview.title);
                result.fill(Field::ImageUrl, preview.image_url);
                result.fill(Field::Brand, preview.brand);
            }
        }

        if result.is_missing(Field::Price) {
            self.fill_price(document, &mut result).await?;
        }

        if result.is_missing(Field::ImageUrl) {
            let image = recover("image", extract_image(document).await)?;
            result.fill(Field::ImageUrl, image);
        }

        if result.is_missing(Field::Title) {
            let fallback = recover("title", title::extract_title(document).await)?;
            result.fill(Field::Title, fallback);
        }

        if result.is_missing(Field::Brand) {
            let from_markup = recover("brand", brand::extract_brand(document).await)?;
            if !result.fill(Field::Brand, from_markup) {
                result.fill(Field::Brand, brand::brand_from_domain(url));
            }
        }

        tracing::debug!(
            url = %url,
            title = result.title.is_some(),
            price = result.price.is_some(),
            brand = result.brand.is_some(),
            image = result.image_url.is_some(),
            complete = result.is_complete(),
            "generic cascade finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "generic_test.rs"]
mod tests;
