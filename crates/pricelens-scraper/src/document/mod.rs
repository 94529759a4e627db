//! Abstract access to a rendered page.
//!
//! Extraction never touches a rendering engine directly. It asks a
//! [`Document`] for serializable [`ElementSnapshot`]s and works on those, so
//! the same pipeline runs against a headless browser bridge, a static HTML
//! parse, or an in-memory fixture.

mod html;
mod state;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AccessorError;

pub use html::HtmlDocument;
pub use state::{extract_balanced_json, extract_state_object};

/// Rendered bounding box in CSS pixels, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Everything extraction needs to know about one matched element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Stable identity within one document, in document order. Lets callers
    /// recognise the same element matched by several selectors.
    pub node_id: usize,
    pub tag: String,
    /// Raw text content of the element and its descendants.
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    /// Text content of the parent element, if any.
    pub parent_text: Option<String>,
    pub visible: bool,
    pub bounds: Option<Bounds>,
    /// Intrinsic pixel size for images, when the accessor knows it.
    pub natural_size: Option<(u32, u32)>,
}

impl ElementSnapshot {
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value trimmed, `None` when absent or blank.
    #[must_use]
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Query capability over one rendered page.
///
/// Every call is a suspension point. Implementations report failures as
/// [`AccessorError`]; only [`AccessorError::Unavailable`] is fatal to a scrape.
#[async_trait]
pub trait Document: Send + Sync {
    /// All elements matching a CSS selector, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, AccessorError>;

    async fn query_first(&self, selector: &str) -> Result<Option<ElementSnapshot>, AccessorError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    /// A JSON state object the page assigned to a global, e.g. `window.__DKT`.
    async fn state_object(&self, name: &str)
        -> Result<Option<serde_json::Value>, AccessorError>;

    /// Full rendered markup.
    async fn content(&self) -> Result<String, AccessorError>;

    /// The navigated URL, after redirects.
    fn url(&self) -> &Url;

    fn viewport(&self) -> Viewport {
        Viewport::default()
    }

    /// Releases the underlying page. Further queries fail with
    /// [`AccessorError::Unavailable`].
    async fn close(&self) -> Result<(), AccessorError> {
        Ok(())
    }
}
