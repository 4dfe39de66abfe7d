//! The `gsscrape` run: resolve request settings, collect, export.

use anyhow::Context;
use gsscrape_core::{parse_key_value_pairs, AppConfig};
use gsscrape_scraper::{collect_records, CollectOptions, PageClient, PageClientSettings};

use crate::export;
use crate::Cli;

/// Merges CLI overrides into the environment-derived settings.
///
/// # Errors
///
/// Returns an error if a `--param` or `--header` value is not `KEY=VALUE`.
pub(crate) fn build_settings(cli: &Cli, config: &AppConfig) -> anyhow::Result<PageClientSettings> {
    let extra_params = parse_key_value_pairs(&cli.params).context("invalid --param")?;
    let extra_headers = parse_key_value_pairs(&cli.headers).context("invalid --header")?;

    let mut settings = PageClientSettings::from_app_config(config);
    if let Some(base_url) = &cli.base_url {
        settings.base_url.clone_from(base_url);
    }
    settings.extra_params = extra_params;
    settings.extra_headers = extra_headers;
    Ok(settings)
}

/// Query key the collection loop advances between pages.
const PAGE_PARAM: &str = "page";

/// Builds the loop options from the CLI flags.
///
/// A `--param page=N` pins every request to the same page, so unless
/// `--max-pages` is given the run is capped at one page.
#[must_use]
pub(crate) fn collect_options(cli: &Cli, settings: &PageClientSettings) -> CollectOptions {
    let max_pages = match cli.max_pages {
        None if settings.extra_params.contains_key(PAGE_PARAM) => {
            tracing::warn!(
                "`--param page` pins every request to one page; fetching a single page (pass --max-pages to change)"
            );
            Some(1)
        }
        max_pages => max_pages,
    };
    CollectOptions {
        target_count: cli.target_count,
        page_size: cli.page_size,
        delay: cli.delay,
        max_pages,
    }
}

/// Collects products and writes them to `cli.output`.
///
/// When nothing was collected a warning is logged and no file is written.
///
/// # Errors
///
/// Returns an error for malformed overrides, an invalid client setup, any
/// page fetch failure, or a CSV write failure.
pub(crate) async fn run_collect(cli: &Cli, config: &AppConfig) -> anyhow::Result<()> {
    let settings = build_settings(cli, config)?;
    let options = collect_options(cli, &settings);

    if cli.dry_run {
        println!(
            "dry-run: would request {} with page size {} until {} products (params: {:?}, headers: {:?})",
            settings.base_url,
            options.page_size,
            options.target_count,
            settings.extra_params,
            settings.extra_headers.keys().collect::<Vec<_>>()
        );
        return Ok(());
    }

    let client = PageClient::new(settings).context("failed to build listing client")?;

    tracing::info!(
        target_count = options.target_count,
        page_size = options.page_size,
        delay_secs = options.delay.as_secs_f64(),
        "starting collection"
    );

    let outcome = collect_records(&client, &options).await?;

    if outcome.records.is_empty() {
        tracing::warn!(
            pages_fetched = outcome.pages_fetched,
            "no products collected; verify the API endpoint and parameters"
        );
        return Ok(());
    }

    export::write_csv(&outcome.records, &cli.output)?;
    tracing::info!(
        count = outcome.records.len(),
        pages_fetched = outcome.pages_fetched,
        stop_reason = ?outcome.stop_reason,
        path = %cli.output.display(),
        "saved products"
    );

    Ok(())
}
