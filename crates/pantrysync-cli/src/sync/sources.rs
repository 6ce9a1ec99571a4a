//! Wiring from [`SyncConfig`] to the real receipt source and catalog store.

use std::io::Write;

use anyhow::Context;
use pantrysync_catalog::CatalogClient;
use pantrysync_core::{CatalogRecord, SourceCredentials, SyncConfig};
use pantrysync_lidl::{LidlClient, LidlSettings, ReceiptDetail, ReceiptSummary};

use super::{CatalogStore, ReceiptSource};

impl ReceiptSource for LidlClient {
    async fn list_receipts(&self) -> anyhow::Result<Vec<ReceiptSummary>> {
        Ok(LidlClient::list_receipts(self).await?)
    }

    async fn receipt_detail(&self, receipt_id: &str) -> anyhow::Result<ReceiptDetail> {
        Ok(LidlClient::receipt_detail(self, receipt_id).await?)
    }
}

impl CatalogStore for CatalogClient {
    async fn upsert(&self, record: &CatalogRecord) -> anyhow::Result<()> {
        Ok(CatalogClient::upsert(self, record).await?)
    }
}

/// Authenticates against Lidl Plus with the configured credentials.
///
/// After an interactive login the issued refresh token is printed so it can
/// be saved as `REFRESH_CREDENTIAL`.
///
/// # Errors
///
/// Returns an error if authentication fails in any way.
pub(crate) async fn connect_receipt_source(config: &SyncConfig) -> anyhow::Result<LidlClient> {
    let settings = LidlSettings::new(
        &config.source_language,
        &config.source_country,
        config.request_timeout_secs,
        &config.user_agent,
    );

    println!("Connecting to Lidl Plus...");
    match &config.credentials {
        SourceCredentials::RefreshToken(token) => {
            println!("Using refresh token for authentication...");
            LidlClient::from_refresh_token(&settings, token)
                .await
                .context("refresh-token authentication failed")
        }
        SourceCredentials::Account { phone, password } => {
            println!("Authenticating with phone and password...");
            let client = LidlClient::login(&settings, phone, password, prompt_verification_code)
                .await
                .context("interactive login failed")?;
            println!("Authenticated! Refresh token: {}", client.refresh_token());
            println!("Save this token as REFRESH_CREDENTIAL for future runs");
            Ok(client)
        }
    }
}

/// Builds the catalog store client.
///
/// # Errors
///
/// Returns an error if the catalog URL is invalid or the HTTP client cannot
/// be built.
pub(crate) fn connect_catalog(config: &SyncConfig) -> anyhow::Result<CatalogClient> {
    CatalogClient::new(
        &config.catalog_url,
        &config.catalog_service_key,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build catalog client")
}

fn prompt_verification_code() -> std::io::Result<String> {
    print!("Enter the verification code sent to your phone: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line)
}
