//! Page sources and the scrape drivers built on them.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use pricelens_core::ExtractionResult;
use reqwest::Client;
use tokio::time::Instant;
use url::Url;

use crate::document::{Document, HtmlDocument};
use crate::error::ScraperError;
use crate::sites::SiteRegistry;

/// Opens one document per URL.
///
/// Each opened page belongs to exactly one scrape and is closed by it.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Page: Document;

    /// # Errors
    ///
    /// Returns [`ScraperError`] when the page cannot be loaded.
    async fn open(&self, url: &str) -> Result<Self::Page, ScraperError>;
}

/// Fetches static markup over HTTP.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Creates a source with a request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    type Page = HtmlDocument;

    async fn open(&self, url: &str) -> Result<HtmlDocument, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .header(reqwest::header::ACCEPT_LANGUAGE, "tr-TR,tr;q=0.9,en;q=0.8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        tracing::debug!(url, final_url = %final_url, bytes = body.len(), "page fetched");
        Ok(HtmlDocument::new(body, final_url))
    }
}

/// Opens `url`, extracts, and closes the page whatever the outcome.
///
/// Never fails: a page that cannot be opened yields a result carrying
/// `error`.
pub async fn scrape<S: PageSource>(
    source: &S,
    registry: &SiteRegistry,
    url: &str,
) -> ExtractionResult {
    run_scrape(source, registry, url, None).await
}

/// [`scrape`] bounded by a wall-clock deadline.
///
/// The deadline covers opening and extraction. An opened page is still
/// closed after the deadline passes.
pub async fn scrape_with_timeout<S: PageSource>(
    source: &S,
    registry: &SiteRegistry,
    url: &str,
    timeout_secs: u64,
) -> ExtractionResult {
    run_scrape(source, registry, url, Some(timeout_secs)).await
}

async fn run_scrape<S: PageSource>(
    source: &S,
    registry: &SiteRegistry,
    url: &str,
    timeout_secs: Option<u64>,
) -> ExtractionResult {
    let deadline = timeout_secs.map(|secs| Instant::now() + Duration::from_secs(secs));
    let secs = timeout_secs.unwrap_or_default();

    let Some(opened) = within(deadline, source.open(url)).await else {
        return timed_out(url, secs);
    };
    let page = match opened {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(url, error = %e, "failed to open page");
            return ExtractionResult::failed(e.to_string());
        }
    };

    let result = within(deadline, registry.extract(&page, url))
        .await
        .unwrap_or_else(|| timed_out(url, secs));

    if let Err(e) = page.close().await {
        tracing::debug!(url, error = %e, "page close failed");
    }
    result
}

/// Runs `fut` to completion, or until `deadline` when one is set.
async fn within<F: Future>(deadline: Option<Instant>, fut: F) -> Option<F::Output> {
    match deadline {
        Some(at) => tokio::time::timeout_at(at, fut).await.ok(),
        None => Some(fut.await),
    }
}

fn timed_out(url: &str, secs: u64) -> ExtractionResult {
    let err = ScraperError::Timeout {
        url: url.to_string(),
        secs,
    };
    tracing::warn!(url, error = %err, "scrape timed out");
    ExtractionResult::failed(err.to_string())
}

/// Scrapes `urls` with at most `concurrency` pages open at once.
///
/// Each URL gets its own page and its own timeout; results come back in
/// input order.
pub async fn scrape_many<S: PageSource>(
    source: &S,
    registry: &SiteRegistry,
    urls: &[String],
    concurrency: usize,
    timeout_secs: u64,
) -> Vec<ExtractionResult> {
    let mut indexed: Vec<(usize, ExtractionResult)> = stream::iter(urls.iter().enumerate())
        .map(|(i, url)| async move {
            (
                i,
                scrape_with_timeout(source, registry, url, timeout_secs).await,
            )
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(i, _)| *i);
    indexed.into_iter().map(|(_, result)| result).collect()
}
