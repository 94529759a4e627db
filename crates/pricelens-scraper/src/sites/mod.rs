//! Site-rule dispatch: known retailers get a dedicated rule, everything else
//! runs the generic cascade.

mod bershka;
mod decathlon;
mod nike;
mod selector_table;

use std::sync::LazyLock;

use async_trait::async_trait;
use pricelens_core::{ConfigError, ExtractionResult, SiteTable};
use url::Url;

use crate::document::Document;
use crate::error::AccessorError;
use crate::generic::GenericRule;
use crate::locale::PriceLocale;

pub use bershka::BershkaRule;
pub use decathlon::{parse_supermodel, DecathlonRule};
pub use nike::NikeRule;
pub use selector_table::SelectorTableRule;

/// One extraction strategy for one kind of page.
///
/// A rule's result is returned to the caller as-is; nothing downstream fills
/// gaps it leaves.
#[async_trait]
pub trait SiteRule: Send + Sync {
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Returns [`AccessorError`] only for failures the rule could not absorb;
    /// the registry turns those into a failed [`ExtractionResult`].
    async fn extract(
        &self,
        document: &dyn Document,
        url: &Url,
    ) -> Result<ExtractionResult, AccessorError>;
}

struct SiteEntry {
    host_fragment: String,
    rule: Box<dyn SiteRule>,
}

/// Immutable host → rule table.
///
/// Built once and shared by reference across concurrent scrapes.
pub struct SiteRegistry {
    entries: Vec<SiteEntry>,
    generic: GenericRule,
}

impl SiteRegistry {
    /// A registry with no site rules: every host runs the generic cascade.
    #[must_use]
    pub fn new(locale: PriceLocale) -> Self {
        Self {
            entries: Vec::new(),
            generic: GenericRule::new(locale),
        }
    }

    /// Built-in rules plus the compiled-in selector table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded selector table is invalid.
    pub fn builtin() -> Result<Self, ConfigError> {
        Ok(Self::with_site_table(SiteTable::builtin()?))
    }

    /// Built-in rules plus one selector-table rule per entry of `table`.
    #[must_use]
    pub fn with_site_table(table: SiteTable) -> Self {
        let locale = PriceLocale::turkish();
        let mut registry = Self::new(locale.clone());
        registry.register("nike.com", Box::new(NikeRule::new(locale.clone())));
        registry.register("bershka.com", Box::new(BershkaRule::new(locale.clone())));
        registry.register("decathlon", Box::new(DecathlonRule::new(locale.clone())));
        for site in table.sites {
            let host = site.host.clone();
            registry.register(&host, Box::new(SelectorTableRule::new(site, locale.clone())));
        }
        registry
    }

    pub fn register(&mut self, host_fragment: &str, rule: Box<dyn SiteRule>) {
        self.entries.push(SiteEntry {
            host_fragment: host_fragment.trim().to_ascii_lowercase(),
            rule,
        });
    }

    /// The rule for a normalized host, the generic cascade when none matches.
    #[must_use]
    pub fn rule_for(&self, host: &str) -> &dyn SiteRule {
        let host = normalize_host(host);
        self.entries
            .iter()
            .find(|e| host.contains(&e.host_fragment))
            .map_or(&self.generic as &dyn SiteRule, |e| e.rule.as_ref())
    }

    /// Runs the matching rule for `url` against `document`.
    ///
    /// Never fails: an unparseable URL or a fatal accessor error yields a
    /// result carrying `error`.
    pub async fn extract(&self, document: &dyn Document, url: &str) -> ExtractionResult {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(url, error = %e, "cannot extract from invalid URL");
                return ExtractionResult::failed(format!("invalid URL \"{url}\": {e}"));
            }
        };
        let host = parsed.host_str().unwrap_or_default();
        let rule = self.rule_for(host);
        tracing::debug!(url, host, rule = rule.name(), "dispatching extraction");

        match rule.extract(document, &parsed).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(url, rule = rule.name(), error = %e, "extraction aborted");
                ExtractionResult::failed(e.to_string())
            }
        }
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new(PriceLocale::turkish())
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

static BUILTIN_REGISTRY: LazyLock<Result<SiteRegistry, ConfigError>> =
    LazyLock::new(SiteRegistry::builtin);

fn builtin_registry() -> Result<&'static SiteRegistry, &'static ConfigError> {
    BUILTIN_REGISTRY.as_ref()
}

/// Extracts product data from `document` using the built-in site rules.
///
/// Never fails; see [`SiteRegistry::extract`].
pub async fn extract(document: &dyn Document, url: &str) -> ExtractionResult {
    match builtin_registry() {
        Ok(registry) => registry.extract(document, url).await,
        Err(e) => {
            tracing::warn!(error = %e, "built-in site table is invalid");
            ExtractionResult::failed(e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;
