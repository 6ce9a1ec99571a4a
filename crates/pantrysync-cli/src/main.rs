mod sync;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Everything is configured through environment variables (or a `.env`
/// file): `CATALOG_URL`, `CATALOG_SERVICE_KEY`, `SOURCE_LANGUAGE`,
/// `SOURCE_COUNTRY`, `REFRESH_CREDENTIAL`, `ACCOUNT_PHONE`,
/// `ACCOUNT_PASSWORD`.
#[derive(Debug, Parser)]
#[command(name = "pantrysync", version)]
#[command(about = "Sync Lidl Plus receipt items into the product catalog")]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    Cli::parse();

    let config = pantrysync_core::load_sync_config().context("invalid configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let result = run(&config).await;
    if let Err(e) = &result {
        tracing::error!(error = ?e, "sync aborted");
    }
    result
}

async fn run(config: &pantrysync_core::SyncConfig) -> anyhow::Result<()> {
    let store = sync::connect_catalog(config)?;
    let source = sync::connect_receipt_source(config).await?;

    let report = sync::run_sync(&source, &store).await?;

    tracing::info!(
        receipts = report.receipts_total,
        skipped = report.receipts_skipped,
        collected = report.records_collected,
        imported = report.imported,
        failed = report.failed,
        "sync complete"
    );
    println!("Done! Imported: {}, Failed: {}", report.imported, report.failed);
    Ok(())
}
