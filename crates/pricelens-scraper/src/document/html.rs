//! [`Document`] over static markup, backed by the `scraper` crate.
//!
//! There is no layout engine behind this accessor: bounding boxes and
//! intrinsic image sizes are always absent, and visibility is inferred from
//! markup (`hidden`, `aria-hidden`, inline `display:none`/`visibility:hidden`
//! on the element or any ancestor, and tags that never render).

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use scraper::{node::Element, ElementRef, Html, Selector};
use url::Url;

use super::{state::extract_state_object, Document, ElementSnapshot};
use crate::error::AccessorError;

const NON_RENDERED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "noscript", "meta", "title", "link",
];

/// A fetched HTML page.
///
/// The markup is re-parsed per query because the parsed tree is not `Send`.
#[derive(Debug)]
pub struct HtmlDocument {
    markup: String,
    url: Url,
    closed: AtomicBool,
}

impl HtmlDocument {
    #[must_use]
    pub fn new(markup: impl Into<String>, url: Url) -> Self {
        Self {
            markup: markup.into(),
            url,
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> Result<(), AccessorError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AccessorError::Unavailable(format!(
                "page {} has been closed",
                self.url
            )));
        }
        Ok(())
    }

    fn select(&self, selector: &str) -> Result<Vec<ElementSnapshot>, AccessorError> {
        let parsed = Selector::parse(selector).map_err(|e| AccessorError::InvalidSelector {
            selector: selector.to_string(),
            reason: format!("{e:?}"),
        })?;

        let html = Html::parse_document(&self.markup);
        let order: HashMap<_, usize> = html
            .tree
            .root()
            .descendants()
            .enumerate()
            .map(|(i, node)| (node.id(), i))
            .collect();

        let snapshots = html
            .select(&parsed)
            .map(|el| snapshot(el, order.get(&el.id()).copied().unwrap_or_default()))
            .collect();
        Ok(snapshots)
    }

    fn inline_scripts(&self) -> Vec<String> {
        let html = Html::parse_document(&self.markup);
        let Ok(selector) = Selector::parse("script:not([src])") else {
            return Vec::new();
        };
        html.select(&selector)
            .map(|s| s.text().collect::<String>())
            .collect()
    }
}

fn snapshot(el: ElementRef<'_>, node_id: usize) -> ElementSnapshot {
    let element = el.value();
    let attributes: BTreeMap<String, String> = element
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let parent_text = el
        .parent()
        .and_then(ElementRef::wrap)
        .map(|p| p.text().collect::<String>());

    let visible = is_rendered(element)
        && el
            .ancestors()
            .filter_map(|n| n.value().as_element())
            .all(is_rendered);

    ElementSnapshot {
        node_id,
        tag: element.name().to_ascii_lowercase(),
        text: el.text().collect(),
        attributes,
        parent_text,
        visible,
        bounds: None,
        natural_size: None,
    }
}

fn is_rendered(element: &Element) -> bool {
    if NON_RENDERED_TAGS.contains(&element.name()) || element.attr("hidden").is_some() {
        return false;
    }
    if element
        .attr("aria-hidden")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    {
        return false;
    }
    let style: String = element
        .attr("style")
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    !(style.contains("display:none") || style.contains("visibility:hidden"))
}

#[async_trait]
impl Document for HtmlDocument {
    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, AccessorError> {
        self.ensure_open()?;
        self.select(selector)
    }

    async fn state_object(
        &self,
        name: &str,
    ) -> Result<Option<serde_json::Value>, AccessorError> {
        self.ensure_open()?;
        Ok(self
            .inline_scripts()
            .iter()
            .find_map(|script| extract_state_object(script, name)))
    }

    async fn content(&self) -> Result<String, AccessorError> {
        self.ensure_open()?;
        Ok(self.markup.clone())
    }

    fn url(&self) -> &Url {
        &self.url
    }

    async fn close(&self) -> Result<(), AccessorError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
