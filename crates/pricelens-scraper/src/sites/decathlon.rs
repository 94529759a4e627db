use async_trait::async_trait;
use pricelens_core::{ExtractionResult, Field, StructuredProductRecord};
use serde_json::Value;
use url::Url;

use super::SiteRule;
use crate::document::Document;
use crate::error::AccessorError;
use crate::extract::{clean_text, json_text, record_result, recover};
use crate::locale::PriceLocale;

const STATE_OBJECT: &str = "__DKT";

/// Reads Decathlon's `window.__DKT` page state.
pub struct DecathlonRule {
    locale: PriceLocale,
}

impl DecathlonRule {
    #[must_use]
    pub fn new(locale: PriceLocale) -> Self {
        Self { locale }
    }
}

/// Product fields from the `Supermodel` entry of `_ctx.data`.
///
/// `None` when the state has no such entry.
#[must_use]
pub fn parse_supermodel(state: &Value) -> Option<StructuredProductRecord> {
    let supermodel = state
        .pointer("/_ctx/data")?
        .as_array()?
        .iter()
        .find(|item| item.get("type").and_then(Value::as_str) == Some("Supermodel"))?
        .get("data")?;

    let model = supermodel.pointer("/models/0");
    let sku = model.and_then(|m| m.pointer("/skus/0"));

    Some(StructuredProductRecord {
        name: model.and_then(|m| m.get("webLabel")).and_then(json_text),
        price: sku.and_then(|s| s.get("price")).and_then(json_text),
        brand: supermodel.pointer("/brand/label").and_then(json_text),
        image_url: model.and_then(|m| m.pointer("/image/url")).and_then(json_text),
        currency: sku.and_then(|s| s.get("currency")).and_then(json_text),
        sku: sku.and_then(|s| s.get("skuId").or_else(|| s.get("id"))).and_then(json_text),
    })
}

#[async_trait]
impl SiteRule for DecathlonRule {
    fn name(&self) -> &str {
        "decathlon"
    }

    async fn extract(
        &self,
        document: &dyn Document,
        _url: &Url,
    ) -> Result<ExtractionResult, AccessorError> {
        let mut result = ExtractionResult::default();

        let state = recover("decathlon_state", document.state_object(STATE_OBJECT).await)?;
        if let Some(record) = state.as_ref().and_then(parse_supermodel) {
            result.fill_missing(record_result(record, &self.locale));
        }

        if result.is_missing(Field::Title) {
            let h1 = recover("decathlon_title", document.query_first("h1").await)?;
            result.fill(Field::Title, h1.map(|h| clean_text(&h.text)));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supermodel_entry() {
        let state = serde_json::json!({
            "_ctx": {"data": [
                {"type": "Breadcrumb", "data": {}},
                {"type": "Supermodel", "data": {
                    "brand": {"label": "KALENJI"},
                    "models": [{
                        "webLabel": "Erkek Koşu Ayakkabısı",
                        "image": {"url": "https://contents.mediadecathlon.com/p1.jpg"},
                        "skus": [{"price": 1299.99, "currency": "TRY", "skuId": "8771"}]
                    }]
                }}
            ]}
        });
        let record = parse_supermodel(&state).unwrap();
        assert_eq!(record.name.as_deref(), Some("Erkek Koşu Ayakkabısı"));
        assert_eq!(record.price.as_deref(), Some("1299.99"));
        assert_eq!(record.brand.as_deref(), Some("KALENJI"));
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://contents.mediadecathlon.com/p1.jpg")
        );
        assert_eq!(record.sku.as_deref(), Some("8771"));
    }

    #[test]
    fn missing_supermodel_is_none() {
        let state = serde_json::json!({"_ctx": {"data": [{"type": "Other"}]}});
        assert!(parse_supermodel(&state).is_none());
        assert!(parse_supermodel(&serde_json::json!({})).is_none());
    }
}
