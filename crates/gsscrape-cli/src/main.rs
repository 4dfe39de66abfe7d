mod collect;
mod export;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gsscrape")]
#[command(about = "Collect product listings from the GS Shop listing API into a CSV file")]
pub(crate) struct Cli {
    /// Number of unique products to collect
    #[arg(long, default_value_t = 1000)]
    pub target_count: usize,

    /// Number of products per page in the API
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Delay between page requests in seconds
    #[arg(long, default_value = "1.0", value_parser = parse_delay)]
    pub delay: Duration,

    /// CSV file to write results to
    #[arg(long, default_value = "gsshop_liquor.csv")]
    pub output: PathBuf,

    /// Additional query parameter for the API call (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Additional HTTP header for the API call (repeatable)
    #[arg(long = "header", value_name = "KEY=VALUE")]
    pub headers: Vec<String>,

    /// Log level or filter directive; `RUST_LOG` takes precedence
    #[arg(long)]
    pub log_level: Option<String>,

    /// Listing API endpoint; overrides `GSSCRAPE_BASE_URL`
    #[arg(long)]
    pub base_url: Option<String>,

    /// Stop after this many pages even if the target was not reached
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Print the resolved request settings and exit without fetching
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let secs = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid delay \"{raw}\": {e}"))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("delay must be a finite, non-negative number of seconds: {raw}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = gsscrape_core::load_app_config()?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    collect::run_collect(&cli, &config).await
}
