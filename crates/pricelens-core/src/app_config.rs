use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Per-request timeout for fetching a page's markup.
    pub request_timeout_secs: u64,
    /// Outer deadline for a whole scrape (fetch + extraction) of one URL.
    pub pipeline_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_scrapes: usize,
    /// Optional YAML file replacing the built-in selector table.
    pub sites_path: Option<PathBuf>,
}
