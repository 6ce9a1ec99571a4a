//! HTTP client for the catalog store's `upsert_product_catalog` RPC.
//!
//! The store is a PostgREST endpoint. The RPC inserts or overwrites the row
//! keyed on `payload.id` and returns the stored row, so an empty result means
//! the write did not happen even though the HTTP call succeeded.

use std::time::Duration;

use pantrysync_core::CatalogRecord;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::CatalogError;

const UPSERT_RPC_PATH: &str = "rest/v1/rpc/upsert_product_catalog";

#[derive(Serialize)]
struct UpsertRequest<'a> {
    payload: &'a CatalogRecord,
}

/// Client for the catalog store. Use [`CatalogClient::new`] with the
/// project URL and a service key.
pub struct CatalogClient {
    client: Client,
    service_key: String,
    upsert_url: Url,
}

impl CatalogClient {
    /// Creates a client for the catalog at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CatalogError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        service_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let upsert_url = Url::parse(&normalised)
            .and_then(|base| base.join(UPSERT_RPC_PATH))
            .map_err(|e| CatalogError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            service_key: service_key.to_owned(),
            upsert_url,
        })
    }

    /// Upserts one record. Repeating the call with the same `id` overwrites
    /// the stored row.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Http`] on network failure.
    /// - [`CatalogError::UnexpectedStatus`] on any non-2xx status.
    /// - [`CatalogError::Rejected`] if the RPC returns an empty result.
    pub async fn upsert(&self, record: &CatalogRecord) -> Result<(), CatalogError> {
        let response = self
            .client
            .post(self.upsert_url.clone())
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&UpsertRequest { payload: record })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.upsert_url.to_string(),
                body: body.trim().to_string(),
            });
        }

        if has_data(&body) {
            tracing::debug!(id = %record.id, "catalog upsert ok");
            Ok(())
        } else {
            Err(CatalogError::Rejected {
                record_id: record.id.clone(),
            })
        }
    }
}

/// `true` when the RPC body carries a non-empty result. `null`, `false`,
/// `""`, `[]`, `{}`, an empty body or a non-JSON body all count as empty.
fn has_data(body: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Null | serde_json::Value::Bool(false)) | Err(_) => false,
        Ok(serde_json::Value::String(s)) => !s.is_empty(),
        Ok(serde_json::Value::Array(a)) => !a.is_empty(),
        Ok(serde_json::Value::Object(o)) => !o.is_empty(),
        Ok(_) => true,
    }
}
