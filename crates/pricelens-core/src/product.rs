use serde::{Deserialize, Serialize};

/// The four product fields every extraction strategy competes to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
    Brand,
    ImageUrl,
}

/// Product data extracted from one page.
///
/// Produced once per scrape and returned to the caller. `price` is always in
/// the canonical display form (e.g. `"1.299,00 TL"`). Absent fields serialize
/// as `null`; `error` is only present when the whole scrape failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub title: Option<String>,
    pub price: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// A result carrying only an error indicator.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Price => self.price.as_deref(),
            Field::Brand => self.brand.as_deref(),
            Field::ImageUrl => self.image_url.as_deref(),
        }
    }

    #[must_use]
    pub fn is_missing(&self, field: Field) -> bool {
        self.get(field).is_none()
    }

    /// Sets `field` only if it is still absent and `value` is non-blank.
    ///
    /// Returns `true` when the value was taken.
    pub fn fill(&mut self, field: Field, value: Option<String>) -> bool {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Price => &mut self.price,
            Field::Brand => &mut self.brand,
            Field::ImageUrl => &mut self.image_url,
        };
        if slot.is_some() {
            return false;
        }
        match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(v) => {
                *slot = Some(v);
                true
            }
            None => false,
        }
    }

    /// Fills every absent field from `other`, leaving populated fields untouched.
    pub fn fill_missing(&mut self, other: ExtractionResult) {
        self.fill(Field::Title, other.title);
        self.fill(Field::Price, other.price);
        self.fill(Field::Brand, other.brand);
        self.fill(Field::ImageUrl, other.image_url);
    }

    /// `true` when all four product fields are populated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [Field::Title, Field::Price, Field::Brand, Field::ImageUrl]
            .into_iter()
            .all(|f| !self.is_missing(f))
    }
}

/// Normalized view of a schema.org `Product` block or a retailer's embedded
/// state object.
///
/// `price` is the raw value as found in the payload (e.g. `"199.90"`), not yet
/// normalized. Every field may be absent; absence sends the cascade on to the
/// next strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredProductRecord {
    pub name: Option<String>,
    pub price: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub currency: Option<String>,
    pub sku: Option<String>,
}

impl StructuredProductRecord {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.brand.is_none()
            && self.image_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_sets_absent_field() {
        let mut result = ExtractionResult::default();
        assert!(result.fill(Field::Title, Some("Shoe X".to_string())));
        assert_eq!(result.title.as_deref(), Some("Shoe X"));
    }

    #[test]
    fn fill_never_overwrites() {
        let mut result = ExtractionResult::default();
        result.fill(Field::Title, Some("From JSON-LD".to_string()));
        assert!(!result.fill(Field::Title, Some("From og:title".to_string())));
        assert_eq!(result.title.as_deref(), Some("From JSON-LD"));
    }

    #[test]
    fn fill_treats_blank_as_absent() {
        let mut result = ExtractionResult::default();
        assert!(!result.fill(Field::Brand, Some("   ".to_string())));
        assert!(result.is_missing(Field::Brand));
        assert!(result.fill(Field::Brand, Some(" Nike ".to_string())));
        assert_eq!(result.brand.as_deref(), Some("Nike"));
    }

    #[test]
    fn fill_missing_is_additive_per_field() {
        let mut result = ExtractionResult {
            title: Some("Kept".to_string()),
            ..ExtractionResult::default()
        };
        result.fill_missing(ExtractionResult {
            title: Some("Ignored".to_string()),
            price: Some("10,00 TL".to_string()),
            ..ExtractionResult::default()
        });
        assert_eq!(result.title.as_deref(), Some("Kept"));
        assert_eq!(result.price.as_deref(), Some("10,00 TL"));
        assert!(result.brand.is_none());
    }

    #[test]
    fn serializes_absent_fields_as_null_without_error_key() {
        let result = ExtractionResult {
            title: Some("Shoe X".to_string()),
            ..ExtractionResult::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Shoe X",
                "price": null,
                "brand": null,
                "imageUrl": null
            })
        );
    }

    #[test]
    fn failed_result_carries_error() {
        let result = ExtractionResult::failed("page closed");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "page closed");
        assert!(!result.is_complete());
    }
}
