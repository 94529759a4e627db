use thiserror::Error;

/// Failure reported by a [`crate::Document`] implementation.
///
/// Only [`AccessorError::Unavailable`] aborts a scrape; the other kinds are
/// scoped to the one query that raised them and the cascade moves on.
#[derive(Debug, Error)]
pub enum AccessorError {
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    #[error("document is no longer available: {0}")]
    Unavailable(String),
}

impl AccessorError {
    /// `true` when the document itself is gone and no further query can succeed.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, AccessorError::Unavailable(_))
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("document accessor failed: {0}")]
    Accessor(#[from] AccessorError),

    #[error("scrape of {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
}
