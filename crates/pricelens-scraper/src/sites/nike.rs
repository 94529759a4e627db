use std::sync::LazyLock;

use async_trait::async_trait;
use pricelens_core::{ExtractionResult, Field};
use regex::Regex;
use url::Url;

use super::SiteRule;
use crate::document::Document;
use crate::error::AccessorError;
use crate::extract::{clean_text, jsonld, record_result, recover};
use crate::image::{image_dimensions, image_source};
use crate::locale::PriceLocale;
use crate::normalize::normalize_price;

/// Whole-text price such as `3.299,00 TL` or `899 TL`.
static STANDALONE_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2})?\s*TL$").expect("valid regex")
});

const CURRENT_PRICE_SELECTOR: &str = r#"[data-testid="currentPrice-container"]"#;
const MIN_PRODUCT_IMAGE_WIDTH: u32 = 400;

pub struct NikeRule {
    locale: PriceLocale,
}

impl NikeRule {
    #[must_use]
    pub fn new(locale: PriceLocale) -> Self {
        Self { locale }
    }

    async fn price(&self, document: &dyn Document) -> Result<Option<String>, AccessorError> {
        let text = match document.query_first(CURRENT_PRICE_SELECTOR).await? {
            Some(container) => Some(clean_text(&container.text)),
            None => document
                .query_all("div, span, p")
                .await?
                .iter()
                .map(|el| clean_text(&el.text))
                .find(|t| STANDALONE_PRICE_RE.is_match(t)),
        };
        Ok(text
            .and_then(|t| normalize_price(&t, &self.locale))
            .map(|p| p.display))
    }

    async fn image(document: &dyn Document) -> Result<Option<String>, AccessorError> {
        let base = document.url();
        Ok(document.query_all("img").await?.iter().find_map(|img| {
            let src = image_source(img, base)?;
            let lower = src.as_str().to_ascii_lowercase();
            let (width, _) = image_dimensions(img);
            (!lower.contains("icon") && !lower.contains("logo") && width > MIN_PRODUCT_IMAGE_WIDTH)
                .then(|| src.to_string())
        }))
    }
}

#[async_trait]
impl SiteRule for NikeRule {
    fn name(&self) -> &str {
        "nike"
    }

    async fn extract(
        &self,
        document: &dyn Document,
        _url: &Url,
    ) -> Result<ExtractionResult, AccessorError> {
        let mut result = ExtractionResult::default();

        result.fill(Field::Price, recover("nike_price", self.price(document).await)?);
        let h1 = recover("nike_title", document.query_first("h1").await)?;
        result.fill(Field::Title, h1.map(|h| clean_text(&h.text)));
        result.fill(Field::ImageUrl, recover("nike_image", Self::image(document).await)?);

        if [Field::Title, Field::Price, Field::ImageUrl]
            .into_iter()
            .any(|f| result.is_missing(f))
        {
            if let Some(record) = recover(
                "structured_data",
                jsonld::extract_structured_product(document).await,
            )? {
                result.fill_missing(record_result(record, &self.locale));
            }
        }

        result.brand = Some("Nike".to_string());
        Ok(result)
    }
}
