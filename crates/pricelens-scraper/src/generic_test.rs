use url::Url;

use super::*;
use crate::document::HtmlDocument;
use crate::test_support::{element, StubDocument};

async fn run(markup: &str, url: &str) -> ExtractionResult {
    let url = Url::parse(url).unwrap();
    let doc = HtmlDocument::new(markup, url.clone());
    GenericRule::default().extract(&doc, &url).await.unwrap()
}

#[tokio::test]
async fn structured_data_fields_are_never_overwritten() {
    let result = run(
        r#"<html><head>
            <script type="application/ld+json">
              {"@type":"Product","name":"From JSON-LD","brand":"Acme",
               "offers":{"price":"59.90"},"image":"https://cdn.example.com/ld.jpg"}
            </script>
            <meta property="og:title" content="From OG">
            <meta property="og:image" content="https://cdn.example.com/og.jpg">
            <meta property="product:price:amount" content="10.00">
            <title>From Title</title>
          </head><body><h1>From H1</h1><span class="price">₺ 1,00</span></body></html>"#,
        "https://www.shopname.com/p/1",
    )
    .await;

    assert_eq!(result.title.as_deref(), Some("From JSON-LD"));
    assert_eq!(result.price.as_deref(), Some("59,90 TL"));
    assert_eq!(result.brand.as_deref(), Some("Acme"));
    assert_eq!(result.image_url.as_deref(), Some("https://cdn.example.com/ld.jpg"));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn social_preview_fills_only_missing_fields() {
    let result = run(
        r#"<script type="application/ld+json">{"@type":"Product","name":"LD Name"}</script>
           <meta property="og:title" content="OG Name">
           <meta property="og:image" content="/img/og.jpg">
           <meta property="og:brand" content="OgBrand">"#,
        "https://shop.example.com/p/1",
    )
    .await;

    assert_eq!(result.title.as_deref(), Some("LD Name"));
    assert_eq!(result.image_url.as_deref(), Some("/img/og.jpg"));
    assert_eq!(result.brand.as_deref(), Some("OgBrand"));
}

#[tokio::test]
async fn social_preview_skipped_when_structured_data_has_title_and_image() {
    let result = run(
        r#"<script type="application/ld+json">
             {"@type":"Product","name":"LD Name","image":"https://cdn.example.com/ld.jpg"}
           </script>
           <meta property="og:title" content="OG Name">
           <meta property="product:brand" content="SocialBrand">"#,
        "https://www.sarar.com.tr/p",
    )
    .await;

    assert_eq!(result.title.as_deref(), Some("LD Name"));
    assert_eq!(result.image_url.as_deref(), Some("https://cdn.example.com/ld.jpg"));
    assert_eq!(result.brand.as_deref(), Some("Sarar"));
}

#[tokio::test]
async fn meta_price_precedes_dom_price() {
    let result = run(
        r#"<meta name="price" content="249,90">
           <div><span class="price" data-price="199">199,00 TL</span></div>"#,
        "https://shop.example.com/p/1",
    )
    .await;

    assert_eq!(result.price.as_deref(), Some("249,90 TL"));
}

#[tokio::test]
async fn dom_price_used_without_meta() {
    let result = run(
        r#"<div class="product-detail">
             <span class="old-price">899,99 TL</span>
             <span class="current-price" data-price="749.99">749,99 TL</span>
           </div>"#,
        "https://shop.example.com/p/1",
    )
    .await;

    assert_eq!(result.price.as_deref(), Some("749,99 TL"));
}

#[tokio::test]
async fn raw_text_is_last_price_resort() {
    let result = run(
        r"<ul><li>Kargo bedava</li><li>Fiyat: 459,00 TL</li></ul>",
        "https://shop.example.com/p/1",
    )
    .await;

    assert_eq!(result.price.as_deref(), Some("459,00 TL"));
}

#[tokio::test]
async fn image_selector_and_title_fallback() {
    let result = run(
        r#"<title>Koşu Ayakkabısı | Mağaza</title>
           <img src="/logo.png" width="90" height="30">
           <img src="/urun/1.jpg" width="600" height="600">"#,
        "https://shop.example.com/p/1",
    )
    .await;

    assert_eq!(result.image_url.as_deref(), Some("https://shop.example.com/urun/1.jpg"));
    assert_eq!(result.title.as_deref(), Some("Koşu Ayakkabısı | Mağaza"));
}

#[tokio::test]
async fn brand_markup_then_domain() {
    let from_markup = run(
        r#"<span class="product-brand">Mavi</span>"#,
        "https://www.sarar.com.tr/p",
    )
    .await;
    assert_eq!(from_markup.brand.as_deref(), Some("Mavi"));

    let from_domain = run("<p>nothing</p>", "https://www.sarar.com.tr/p").await;
    assert_eq!(from_domain.brand.as_deref(), Some("Sarar"));
}

#[tokio::test]
async fn empty_page_yields_all_absent() {
    let result = run("<html><body></body></html>", "http://127.0.0.1:8080/p").await;
    assert_eq!(result, ExtractionResult::default());
}

#[tokio::test]
async fn non_fatal_strategy_failure_continues_cascade() {
    let url = Url::parse("https://shop.example.com/p").unwrap();
    let mut doc = StubDocument::at(url.as_str()).with("h1", vec![element(1, "h1", "Stub Title")]);
    doc.failing_selectors
        .push(r#"script[type="application/ld+json"]"#.to_string());

    let result = GenericRule::default().extract(&doc, &url).await.unwrap();
    assert_eq!(result.title.as_deref(), Some("Stub Title"));
    assert_eq!(result.brand.as_deref(), Some("Example"));
}

#[tokio::test]
async fn fatal_accessor_error_aborts() {
    let url = Url::parse("https://shop.example.com/p").unwrap();
    let mut doc = StubDocument::at(url.as_str());
    doc.unavailable = true;

    let err = GenericRule::default().extract(&doc, &url).await.unwrap_err();
    assert!(err.is_fatal());
}
