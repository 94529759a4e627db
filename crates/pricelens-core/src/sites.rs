//! Declarative selector table for retailers that need no custom logic.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const BUILTIN_SITES: &str = include_str!("../../../config/sites.yaml");

/// Ordered CSS selector lists for one retailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Substring matched against the lower-cased, `www.`-stripped host.
    pub host: String,
    /// Display name, also reported as the product brand.
    pub name: String,
    #[serde(default)]
    pub title: Vec<String>,
    pub price: Vec<String>,
    #[serde(default)]
    pub image: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteTable {
    pub sites: Vec<SiteSelectors>,
}

impl SiteTable {
    /// The table compiled in from `config/sites.yaml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded YAML fails to parse or validate.
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_site_table(BUILTIN_SITES)
    }
}

/// Load and validate a selector table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_site_table(path: &Path) -> Result<SiteTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SiteTableIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_site_table(&content)
}

/// Parse and validate a selector table from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_site_table(content: &str) -> Result<SiteTable, ConfigError> {
    let mut table: SiteTable = serde_yaml::from_str(content)?;
    for site in &mut table.sites {
        site.host = site.host.trim().to_lowercase();
    }
    validate_sites(&table)?;
    Ok(table)
}

fn validate_sites(table: &SiteTable) -> Result<(), ConfigError> {
    let mut seen_hosts = HashSet::new();

    for site in &table.sites {
        if site.host.is_empty() {
            return Err(ConfigError::Validation(
                "site host must be non-empty".to_string(),
            ));
        }
        if site.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "site '{}' has an empty name",
                site.host
            )));
        }
        if site.price.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "site '{}' needs at least one price selector",
                site.host
            )));
        }
        if !seen_hosts.insert(site.host.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate site host: '{}'",
                site.host
            )));
        }
    }

    Ok(())
}
