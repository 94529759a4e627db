//! schema.org `Product` blocks from `<script type="application/ld+json">`.

use pricelens_core::StructuredProductRecord;
use serde_json::Value;

use super::json_text;
use crate::document::Document;
use crate::error::AccessorError;

const JSONLD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// First non-empty `Product` item across every JSON-LD block on the page.
///
/// Blocks that are not valid JSON are skipped.
///
/// # Errors
///
/// Returns [`AccessorError`] if the document cannot be queried.
pub async fn extract_structured_product(
    document: &dyn Document,
) -> Result<Option<StructuredProductRecord>, AccessorError> {
    let blocks = document.query_all(JSONLD_SELECTOR).await?;
    Ok(blocks
        .iter()
        .find_map(|block| parse_structured_product(&block.text)))
}

/// First non-empty `Product` item in one JSON-LD block.
///
/// A `Product` carrying none of name, price, brand or image is passed over.
#[must_use]
pub fn parse_structured_product(json_text: &str) -> Option<StructuredProductRecord> {
    let value: Value = serde_json::from_str(json_text.trim()).ok()?;
    let mut items = Vec::new();
    flatten_items(&value, &mut items);
    items
        .into_iter()
        .filter(|item| is_product(item))
        .map(product_record)
        .find(|record| !record.is_empty())
}

/// Top-level objects, arrays (nested too) and `@graph` containers.
fn flatten_items<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_items(item, out);
            }
        }
        Value::Object(map) => {
            out.push(value);
            if let Some(graph) = map.get("@graph") {
                flatten_items(graph, out);
            }
        }
        _ => {}
    }
}

fn is_product(item: &Value) -> bool {
    let Some(type_node) = item.get("@type") else {
        return false;
    };
    // `@type` may be a plain string or an array of strings.
    match type_node {
        Value::String(s) => is_product_type(s),
        Value::Array(types) => types.iter().filter_map(Value::as_str).any(is_product_type),
        _ => false,
    }
}

fn is_product_type(t: &str) -> bool {
    let local = t
        .strip_prefix("https://schema.org/")
        .or_else(|| t.strip_prefix("http://schema.org/"))
        .unwrap_or(t);
    local == "Product"
}

fn product_record(item: &Value) -> StructuredProductRecord {
    let offer = item.get("offers").and_then(|offers| match offers {
        Value::Array(list) => list.first(),
        other => Some(other),
    });

    let price = offer
        .and_then(|o| {
            o.get("price")
                .and_then(json_text)
                .or_else(|| o.get("lowPrice").and_then(json_text))
        })
        .or_else(|| item.get("price").and_then(json_text));

    StructuredProductRecord {
        name: item
            .get("name")
            .and_then(json_text)
            .or_else(|| item.get("title").and_then(json_text)),
        price,
        brand: item
            .get("brand")
            .and_then(named)
            .or_else(|| item.get("manufacturer").and_then(named)),
        image_url: item.get("image").and_then(image_url),
        currency: offer
            .and_then(|o| o.get("priceCurrency"))
            .and_then(json_text),
        sku: item.get("sku").and_then(json_text),
    }
}

/// A string, or an object's `name`.
fn named(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => value.get("name").and_then(json_text),
        other => json_text(other),
    }
}

/// A string, the first element of an array, or an `ImageObject`'s `url`.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::Array(list) => list.first().and_then(image_url),
        Value::Object(_) => value.get("url").and_then(json_text),
        other => json_text(other),
    }
}
