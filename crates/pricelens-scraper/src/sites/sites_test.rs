use pricelens_core::parse_site_table;

use super::*;
use crate::document::HtmlDocument;
use crate::test_support::StubDocument;

fn doc(markup: &str, url: &str) -> HtmlDocument {
    HtmlDocument::new(markup, Url::parse(url).unwrap())
}

fn registry() -> SiteRegistry {
    SiteRegistry::builtin().unwrap()
}

// ---------------------------------------------------------------------------
// dispatch
// ---------------------------------------------------------------------------

#[test]
fn rule_for_matches_host_fragments() {
    let registry = registry();
    assert_eq!(registry.rule_for("www.nike.com").name(), "nike");
    assert_eq!(registry.rule_for("WWW.BERSHKA.COM").name(), "bershka");
    assert_eq!(registry.rule_for("www.decathlon.com.tr").name(), "decathlon");
    assert_eq!(registry.rule_for("www.beymen.com").name(), "Beymen");
    assert_eq!(registry.rule_for("www.trendyol.com").name(), "generic");
}

#[test]
fn empty_registry_always_uses_generic() {
    let registry = SiteRegistry::default();
    assert_eq!(registry.rule_for("www.nike.com").name(), "generic");
}

#[tokio::test]
async fn invalid_url_yields_error_result() {
    let d = doc("<p>x</p>", "https://shop.example.com/");
    let result = registry().extract(&d, "not a url").await;
    assert!(result.error.as_deref().is_some_and(|e| e.contains("invalid URL")));
    assert!(result.title.is_none());
}

#[tokio::test]
async fn fatal_accessor_error_yields_error_result() {
    let mut stub = StubDocument::at("https://shop.example.com/p");
    stub.unavailable = true;
    let result = registry().extract(&stub, "https://shop.example.com/p").await;
    assert!(result.error.is_some());
}

#[tokio::test]
async fn registered_rule_result_is_not_merged_with_generic() {
    // the page has an og:title, but a site rule that finds no title leaves it
    // absent
    let table = parse_site_table(
        "sites:\n  - host: shop.example.com\n    name: Example\n    price: ['.fiyat']\n",
    )
    .unwrap();
    let registry = SiteRegistry::with_site_table(table);
    let d = doc(
        r#"<meta property="og:title" content="OG Title"><span class="fiyat">149,90 TL</span>"#,
        "https://shop.example.com/p",
    );

    let result = registry.extract(&d, "https://shop.example.com/p").await;
    assert_eq!(result.price.as_deref(), Some("149,90 TL"));
    assert_eq!(result.brand.as_deref(), Some("Example"));
    assert!(result.title.is_none());
}

#[tokio::test]
async fn free_extract_uses_builtin_rules() {
    let d = doc(
        r#"<script type="application/ld+json">
             {"@type":"Product","name":"Oversize T-shirt","offers":{"price":"399.95"}}
           </script>"#,
        "https://www.bershka.com/tr/p.html",
    );
    let result = extract(&d, "https://www.bershka.com/tr/p.html").await;
    assert_eq!(result.title.as_deref(), Some("Oversize T-shirt"));
    assert_eq!(result.brand.as_deref(), Some("Bershka"));
}

#[test]
fn builtin_registry_is_built_once() {
    let first = builtin_registry().unwrap();
    let second = builtin_registry().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.rule_for("www.nike.com").name(), "nike");
}

// ---------------------------------------------------------------------------
// nike
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nike_reads_current_price_container_and_large_image() {
    let d = doc(
        r#"<h1>Nike Air Zoom Pegasus 40</h1>
           <img src="/icons/swoosh.png" width="800" height="800">
           <img src="https://static.nike.com/thumb.jpg" width="300" height="300">
           <img src="https://static.nike.com/main.jpg" width="1000" height="1000">
           <div data-testid="currentPrice-container">4.299,99 TL</div>"#,
        "https://www.nike.com/tr/t/pegasus",
    );
    let result = registry().extract(&d, "https://www.nike.com/tr/t/pegasus").await;

    assert_eq!(result.title.as_deref(), Some("Nike Air Zoom Pegasus 40"));
    assert_eq!(result.price.as_deref(), Some("4.299,99 TL"));
    assert_eq!(result.image_url.as_deref(), Some("https://static.nike.com/main.jpg"));
    assert_eq!(result.brand.as_deref(), Some("Nike"));
}

#[tokio::test]
async fn nike_falls_back_to_standalone_price_text_and_json_ld() {
    let d = doc(
        r#"<h1>Nike Dunk Low</h1>
           <div><p>Ücretsiz kargo</p><span>3.799 TL</span></div>
           <script type="application/ld+json">
             {"@type":"Product","name":"Ignored","image":"https://static.nike.com/ld.jpg"}
           </script>"#,
        "https://www.nike.com/tr/t/dunk",
    );
    let result = registry().extract(&d, "https://www.nike.com/tr/t/dunk").await;

    assert_eq!(result.title.as_deref(), Some("Nike Dunk Low"));
    assert_eq!(result.price.as_deref(), Some("3.799,00 TL"));
    assert_eq!(result.image_url.as_deref(), Some("https://static.nike.com/ld.jpg"));
}

// ---------------------------------------------------------------------------
// bershka
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bershka_without_json_ld_returns_empty_result() {
    let d = doc(
        "<h1>Visible title</h1><span>199,95 TL</span>",
        "https://www.bershka.com/tr/p.html",
    );
    let result = registry().extract(&d, "https://www.bershka.com/tr/p.html").await;
    assert_eq!(result, ExtractionResult::default());
}

#[tokio::test]
async fn bershka_prefers_block_brand() {
    let d = doc(
        r#"<script type="application/ld+json">
             {"@type":"Product","name":"Jean","brand":{"name":"BSK"},
              "offers":[{"price":"1099.00"}],"image":["https://static.bershka.net/1.jpg"]}
           </script>"#,
        "https://www.bershka.com/tr/jean.html",
    );
    let result = registry().extract(&d, "https://www.bershka.com/tr/jean.html").await;
    assert_eq!(result.brand.as_deref(), Some("BSK"));
    assert_eq!(result.price.as_deref(), Some("1.099,00 TL"));
    assert_eq!(result.image_url.as_deref(), Some("https://static.bershka.net/1.jpg"));
}

// ---------------------------------------------------------------------------
// decathlon
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decathlon_reads_state_object() {
    let d = doc(
        r#"<h1>Fallback</h1>
           <script>
             window.__DKT = {"_ctx":{"data":[{"type":"Supermodel","data":{
               "brand":{"label":"QUECHUA"},
               "models":[{"webLabel":"Kamp Çadırı 2 Kişilik",
                          "image":{"url":"https://contents.mediadecathlon.com/t.jpg"},
                          "skus":[{"price":2499,"currency":"TRY"}]}]}}]}};
           </script>"#,
        "https://www.decathlon.com.tr/p/cadir",
    );
    let result = registry().extract(&d, "https://www.decathlon.com.tr/p/cadir").await;

    assert_eq!(result.title.as_deref(), Some("Kamp Çadırı 2 Kişilik"));
    assert_eq!(result.price.as_deref(), Some("2.499,00 TL"));
    assert_eq!(result.brand.as_deref(), Some("QUECHUA"));
    assert_eq!(
        result.image_url.as_deref(),
        Some("https://contents.mediadecathlon.com/t.jpg")
    );
}

#[tokio::test]
async fn decathlon_without_state_uses_h1() {
    let d = doc("<h1> Mont </h1>", "https://www.decathlon.com.tr/p/mont");
    let result = registry().extract(&d, "https://www.decathlon.com.tr/p/mont").await;
    assert_eq!(result.title.as_deref(), Some("Mont"));
    assert!(result.price.is_none());
    assert!(result.brand.is_none());
}

// ---------------------------------------------------------------------------
// selector table
// ---------------------------------------------------------------------------

#[tokio::test]
async fn selector_table_tries_selectors_in_order() {
    let d = doc(
        r#"<h1 class="o-productDetail__description">Beymen Ceket</h1>
           <ins class="m-price__new">12.499,00 TL</ins>
           <img class="m-productDetailImage__item" data-src="//cdn.beymen.com/p/1.jpg">"#,
        "https://www.beymen.com/p/ceket",
    );
    let result = registry().extract(&d, "https://www.beymen.com/p/ceket").await;

    assert_eq!(result.title.as_deref(), Some("Beymen Ceket"));
    assert_eq!(result.price.as_deref(), Some("12.499,00 TL"));
    assert_eq!(result.image_url.as_deref(), Some("https://cdn.beymen.com/p/1.jpg"));
    assert_eq!(result.brand.as_deref(), Some("Beymen"));
}

#[tokio::test]
async fn selector_table_skips_invalid_selectors() {
    let table = parse_site_table(
        "sites:\n  - host: shop.example.com\n    name: Example\n    price: ['span[', '.fiyat']\n",
    )
    .unwrap();
    let registry = SiteRegistry::with_site_table(table);
    let d = doc(r#"<b class="fiyat">75 TL</b>"#, "https://shop.example.com/p");

    let result = registry.extract(&d, "https://shop.example.com/p").await;
    assert_eq!(result.price.as_deref(), Some("75,00 TL"));
}
