use async_trait::async_trait;
use pricelens_core::{ExtractionResult, Field};
use url::Url;

use super::SiteRule;
use crate::document::Document;
use crate::error::AccessorError;
use crate::extract::{jsonld, record_result, recover};
use crate::locale::PriceLocale;

/// Bershka pages carry a complete JSON-LD `Product`; nothing else is read.
pub struct BershkaRule {
    locale: PriceLocale,
}

impl BershkaRule {
    #[must_use]
    pub fn new(locale: PriceLocale) -> Self {
        Self { locale }
    }
}

#[async_trait]
impl SiteRule for BershkaRule {
    fn name(&self) -> &str {
        "bershka"
    }

    async fn extract(
        &self,
        document: &dyn Document,
        _url: &Url,
    ) -> Result<ExtractionResult, AccessorError> {
        let mut result = ExtractionResult::default();
        let Some(record) = recover(
            "structured_data",
            jsonld::extract_structured_product(document).await,
        )?
        else {
            return Ok(result);
        };

        result.fill_missing(record_result(record, &self.locale));
        result.fill(Field::Brand, Some("Bershka".to_string()));
        Ok(result)
    }
}
