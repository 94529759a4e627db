//! In-memory [`Document`] for unit tests that need geometry the static HTML
//! accessor cannot provide.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use url::Url;

use crate::document::{Bounds, Document, ElementSnapshot, Viewport};
use crate::error::AccessorError;

#[derive(Debug, Default)]
pub(crate) struct StubDocument {
    pub url: Option<Url>,
    pub by_selector: HashMap<String, Vec<ElementSnapshot>>,
    pub state: HashMap<String, serde_json::Value>,
    pub content: String,
    /// Every call fails with this error kind when set.
    pub unavailable: bool,
    pub failing_selectors: Vec<String>,
}

impl StubDocument {
    pub fn at(url: &str) -> Self {
        Self {
            url: Some(Url::parse(url).unwrap()),
            ..Self::default()
        }
    }

    pub fn with(mut self, selector: &str, elements: Vec<ElementSnapshot>) -> Self {
        self.by_selector
            .entry(selector.to_string())
            .or_default()
            .extend(elements);
        self
    }

    fn check(&self, selector: &str) -> Result<(), AccessorError> {
        if self.unavailable {
            return Err(AccessorError::Unavailable("target closed".into()));
        }
        if self.failing_selectors.iter().any(|s| s == selector) {
            return Err(AccessorError::Evaluation(format!("cannot evaluate {selector}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Document for StubDocument {
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, AccessorError> {
        self.check(selector)?;
        Ok(self.by_selector.get(selector).cloned().unwrap_or_default())
    }

    async fn state_object(
        &self,
        name: &str,
    ) -> Result<Option<serde_json::Value>, AccessorError> {
        self.check(name)?;
        Ok(self.state.get(name).cloned())
    }

    async fn content(&self) -> Result<String, AccessorError> {
        self.check("")?;
        Ok(self.content.clone())
    }

    fn url(&self) -> &Url {
        self.url.as_ref().expect("stub document needs a url")
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: 1280,
            height: 800,
        }
    }
}

/// Element builder for stub documents.
pub(crate) fn element(node_id: usize, tag: &str, text: &str) -> ElementSnapshot {
    ElementSnapshot {
        node_id,
        tag: tag.to_string(),
        text: text.to_string(),
        attributes: BTreeMap::new(),
        parent_text: None,
        visible: true,
        bounds: None,
        natural_size: None,
    }
}

pub(crate) trait SnapshotExt {
    fn attr_set(self, name: &str, value: &str) -> Self;
    fn parent(self, text: &str) -> Self;
    fn hidden(self) -> Self;
    fn at_top(self, top: f64) -> Self;
    fn natural(self, width: u32, height: u32) -> Self;
}

impl SnapshotExt for ElementSnapshot {
    fn attr_set(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    fn parent(mut self, text: &str) -> Self {
        self.parent_text = Some(text.to_string());
        self
    }

    fn hidden(mut self) -> Self {
        self.visible = false;
        self.bounds = None;
        self
    }

    fn at_top(mut self, top: f64) -> Self {
        self.bounds = Some(Bounds {
            top,
            left: 0.0,
            width: 120.0,
            height: 24.0,
        });
        self
    }

    fn natural(mut self, width: u32, height: u32) -> Self {
        self.natural_size = Some((width, height));
        self
    }
}
