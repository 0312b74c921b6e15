mod city;
mod export;
mod inspect;
mod probe;
mod scrape;

use std::path::PathBuf;

use balad_core::{AppConfig, PageErrorPolicy};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "balad")]
#[command(about = "Collect business listings from balad.ir city category pages")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    scrape: ScrapeArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one listing page and report what each extraction strategy finds
    Inspect {
        /// City name or slug; prompts when omitted
        city: Option<String>,

        /// Page ordinal to fetch
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Check that the upstream site is reachable
    Probe,
}

/// Options for the default scrape run. Flags override the environment.
#[derive(Debug, Args)]
struct ScrapeArgs {
    /// City name (English or Persian) or slug; prompts when omitted
    city: Option<String>,

    /// Listing category path segment
    #[arg(long)]
    category: Option<String>,

    /// Highest page ordinal to request
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// Pause between successive page requests, in milliseconds (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    delay_ms: Option<u64>,

    /// What to do when a page fails: halt or skip
    #[arg(long)]
    on_page_error: Option<PageErrorPolicy>,

    /// JSON output path; defaults to a timestamped file in BALAD_OUTPUT_DIR
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also write a CSV file next to the JSON output
    #[arg(long)]
    csv: bool,

    /// Keep duplicate (name, address) listings
    #[arg(long)]
    no_dedup: bool,
}

impl ScrapeArgs {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(category) = &self.category {
            config.category.clone_from(category);
        }
        if let Some(max_pages) = self.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.inter_request_delay_ms = delay_ms;
        }
        if let Some(policy) = self.on_page_error {
            config.on_page_error = policy;
        }
    }
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = balad_core::load_app_config()?;
    init_tracing(&config.log_level)?;

    match cli.command {
        Some(Commands::Inspect { city, page }) => {
            inspect::run_inspect(&config, city.as_deref(), page).await
        }
        Some(Commands::Probe) => probe::run_probe(&config).await,
        None => scrape::run_scrape(config, &cli.scrape).await,
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        base_url: "https://balad.ir".to_string(),
        category: "supermarket".to_string(),
        request_timeout_secs: 30,
        user_agent: "ua".to_string(),
        accept_language: "fa".to_string(),
        inter_request_delay_ms: 1500,
        max_pages: 30,
        on_page_error: PageErrorPolicy::Halt,
        log_level: "info".to_string(),
        cities_path: None,
        output_dir: PathBuf::from("."),
    }
}
