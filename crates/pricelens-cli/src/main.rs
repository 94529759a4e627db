mod scrape;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pricelens_core::Environment;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricelens")]
#[command(about = "Extract title, price, brand and image from product pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape product pages and print the results as JSON
    Scrape {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Read markup from a local file instead of fetching (one URL only)
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
        /// Selector table to use instead of the built-in one
        #[arg(long, value_name = "PATH")]
        sites: Option<PathBuf>,
    },
    /// Scrape one page and print price events against a stored price
    Events {
        url: String,
        /// Last known display price; omit for a product seen the first time
        #[arg(long)]
        previous_price: Option<String>,
        #[arg(long, value_name = "PATH")]
        sites: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            println!("{}", scrape::error_json(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when a scrape completed but reported an error.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = pricelens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(colored_logs(&config.env))
        .with_target(config.env != Environment::Production)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let default_sites = config.sites_path.as_deref();
    match cli.command {
        Commands::Scrape { urls, html, sites } => {
            let registry = scrape::build_registry(sites.as_deref().or(default_sites))?;
            scrape::run_scrape(&config, &registry, &urls, html.as_deref()).await
        }
        Commands::Events {
            url,
            previous_price,
            sites,
        } => {
            let registry = scrape::build_registry(sites.as_deref().or(default_sites))?;
            scrape::run_events(&config, &registry, &url, previous_price.as_deref()).await
        }
    }
}

/// ANSI colors in development only.
fn colored_logs(env: &Environment) -> bool {
    *env == Environment::Development
}
