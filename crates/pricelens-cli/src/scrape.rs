//! Command handlers for the CLI.
//!
//! Results go to stdout as pretty JSON; logs go to stderr. A scrape that
//! fails is still printed, as `{"error": …}`, and reported back to `main`
//! so the process exits non-zero.

use std::path::Path;

use pricelens_core::{AppConfig, ExtractionResult};
use pricelens_scraper::{
    diff_prices, scrape_many, scrape_with_timeout, HtmlDocument, HttpPageSource, PriceLocale,
    SiteRegistry,
};
use url::Url;

/// The built-in registry, or one built from the selector table at `path`.
///
/// # Errors
///
/// Returns an error if the selector table cannot be read or is invalid.
pub(crate) fn build_registry(path: Option<&Path>) -> anyhow::Result<SiteRegistry> {
    let Some(path) = path else {
        return Ok(SiteRegistry::builtin()?);
    };
    let table = pricelens_core::load_site_table(path)?;
    tracing::info!(path = %path.display(), sites = table.sites.len(), "loaded site table");
    Ok(SiteRegistry::with_site_table(table))
}

/// Scrape every URL and print the results.
///
/// With `html`, the single URL is not fetched; the file's markup is
/// extracted as if it had been served from that URL.
///
/// # Errors
///
/// Returns an error if `html` is combined with several URLs, the file cannot
/// be read, or the HTTP client cannot be built. Per-URL failures are printed,
/// not propagated.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    registry: &SiteRegistry,
    urls: &[String],
    html: Option<&Path>,
) -> anyhow::Result<bool> {
    let results = if let Some(path) = html {
        let [url] = urls else {
            anyhow::bail!("--html takes exactly one URL, got {}", urls.len());
        };
        vec![extract_from_file(registry, url, path).await?]
    } else {
        let source = HttpPageSource::new(config.request_timeout_secs, &config.user_agent)?;
        scrape_many(
            &source,
            registry,
            urls,
            config.max_concurrent_scrapes,
            config.pipeline_timeout_secs,
        )
        .await
    };

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        tracing::warn!(failed, total = results.len(), "some scrapes failed");
    }

    let output = match results.as_slice() {
        [single] => render_result(single)?,
        _ => serde_json::to_string_pretty(&results)?,
    };
    println!("{output}");
    Ok(failed == 0)
}

/// Scrape `url` and print the price events relative to `previous_price`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub(crate) async fn run_events(
    config: &AppConfig,
    registry: &SiteRegistry,
    url: &str,
    previous_price: Option<&str>,
) -> anyhow::Result<bool> {
    let source = HttpPageSource::new(config.request_timeout_secs, &config.user_agent)?;
    let result = scrape_with_timeout(&source, registry, url, config.pipeline_timeout_secs).await;
    if let Some(error) = &result.error {
        println!("{}", error_json(error));
        return Ok(false);
    }

    let events = diff_prices(
        url,
        previous_price,
        &result,
        &PriceLocale::default(),
        chrono::Utc::now(),
    );
    tracing::info!(url, events = events.len(), "price events computed");
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(true)
}

async fn extract_from_file(
    registry: &SiteRegistry,
    url: &str,
    path: &Path,
) -> anyhow::Result<ExtractionResult> {
    let markup = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let Ok(base) = Url::parse(url) else {
        return Ok(ExtractionResult::failed(format!("invalid URL: {url}")));
    };
    let document = HtmlDocument::new(markup, base);
    Ok(registry.extract(&document, url).await)
}

/// A successful result as-is; a failed one as `{"error": …}`.
fn render_result(result: &ExtractionResult) -> anyhow::Result<String> {
    match &result.error {
        Some(error) => Ok(error_json(error)),
        None => Ok(serde_json::to_string_pretty(result)?),
    }
}

pub(crate) fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_renders_error_object() {
        let rendered = render_result(&ExtractionResult::failed("timeout")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "timeout" }));
    }

    #[test]
    fn successful_result_renders_all_fields() {
        let result = ExtractionResult {
            title: Some("Shoe X".to_string()),
            price: Some("199,90 TL".to_string()),
            ..ExtractionResult::default()
        };
        let rendered = render_result(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Shoe X",
                "price": "199,90 TL",
                "brand": null,
                "imageUrl": null
            })
        );
    }

    #[test]
    fn builtin_registry_without_path() {
        let registry = build_registry(None).unwrap();
        assert_eq!(registry.rule_for("www.nike.com").name(), "nike");
    }

    #[test]
    fn missing_site_table_is_an_error() {
        assert!(build_registry(Some(Path::new("/nonexistent/sites.yaml"))).is_err());
    }

    #[tokio::test]
    async fn html_file_is_extracted_against_given_url() {
        let path = std::env::temp_dir().join(format!("pricelens-cli-{}.html", std::process::id()));
        std::fs::write(
            &path,
            r#"<title>Deri Ceket</title><meta property="product:price:amount" content="1299.00">"#,
        )
        .unwrap();

        let registry = SiteRegistry::default();
        let result = extract_from_file(&registry, "http://127.0.0.1:8080/p", &path)
            .await
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result.title.as_deref(), Some("Deri Ceket"));
        assert_eq!(result.price.as_deref(), Some("1.299,00 TL"));
    }
}
