//! CLI entry point for the id generator.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use cam_core::{BackoffPolicy, DiscoveryConfig, DiscoveryEngine, IdsFile, StatsApiClient};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(
        concurrency = args.concurrency,
        max_attempts = ?args.max_attempts,
        output = %args.output.display(),
        api_base = %args.api_base,
        "CLI arguments parsed"
    );

    let Some(api_key) = args.key.filter(|key| !key.trim().is_empty()) else {
        bail!("No API key provided (use --key or STEAM_WEBAPI_KEY)");
    };
    let Some(steam_id) = args.steamid.filter(|id| !id.trim().is_empty()) else {
        bail!(
            "No steam id provided (use --steamid or STEAM_ID); \
             this build has no local stats provider to resolve it"
        );
    };

    let mut backoff = BackoffPolicy::new(
        Duration::from_secs(args.throttle_backoff),
        Duration::from_secs(args.retry_backoff),
    );
    if let Some(max_attempts) = args.max_attempts {
        backoff = backoff.with_max_attempts(max_attempts);
    }

    let mut config = DiscoveryConfig::new(api_key, steam_id);
    config.api_base = args.api_base;
    config.concurrency = usize::from(args.concurrency);
    config.request_timeout = Duration::from_secs(args.timeout);
    config.backoff = backoff;
    config.validate()?;

    // Open the output before any network work so an unwritable path fails fast
    let mut ids_file = IdsFile::open(&args.output).await?;

    let client = Arc::new(StatsApiClient::new(&config)?);
    let catalog = client.owned_games().await?;
    info!(games = catalog.len(), "Catalog listed");

    let engine = DiscoveryEngine::from_config(&config)?;
    let report = engine.run(&catalog, client).await?;
    let summary = report.summary();

    info!(
        qualified = summary.qualified,
        path = %ids_file.path().display(),
        "Games with achievements left to unlock, writing them to the ids file"
    );

    let written = ids_file.append(report.into_qualified()).await?;

    info!(
        written,
        completed = summary.completed,
        failed_attempts = summary.failed_attempts,
        abandoned = summary.abandoned,
        "Done"
    );

    Ok(())
}
