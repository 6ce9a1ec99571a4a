//! HTTP client for the Lidl Plus tickets API.
//!
//! A [`LidlClient`] only exists in an authenticated state: construct it with
//! [`LidlClient::from_refresh_token`] or [`LidlClient::login`]. All requests
//! are issued one at a time by the caller; the client holds no background
//! tasks and performs no retries.

mod auth;

use std::time::Duration;

use reqwest::{Client, Response, Url};

use crate::error::LidlError;
use crate::types::{ReceiptDetail, ReceiptSummary, TicketsPage};

const DEFAULT_AUTH_BASE_URL: &str = "https://accounts.lidl.com/";
const DEFAULT_TICKETS_BASE_URL: &str = "https://tickets.lidlplus.com/api/v2/";

/// Upper bound on ticket pages followed in one listing. Guards against a
/// server that keeps returning full pages.
pub(crate) const MAX_TICKET_PAGES: u32 = 100;

const APP_ID: &str = "com.lidl.eci.lidl.plus";
const APP_VERSION: &str = "999.99.9";
const OPERATING_SYSTEM: &str = "iOs";

/// Locale and transport settings for a [`LidlClient`].
#[derive(Debug, Clone)]
pub struct LidlSettings {
    /// Account language, e.g. `"nl"`. Sent as `Accept-Language`.
    pub language: String,
    /// Country code used in ticket paths, e.g. `"BE"`.
    pub country: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub auth_base_url: String,
    pub tickets_base_url: String,
}

impl LidlSettings {
    /// Settings pointed at the production Lidl Plus endpoints.
    #[must_use]
    pub fn new(language: &str, country: &str, timeout_secs: u64, user_agent: &str) -> Self {
        Self {
            language: language.to_owned(),
            country: country.to_owned(),
            timeout_secs,
            user_agent: user_agent.to_owned(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_owned(),
            tickets_base_url: DEFAULT_TICKETS_BASE_URL.to_owned(),
        }
    }

    /// Overrides both endpoints (for testing with wiremock).
    #[must_use]
    pub fn with_base_urls(mut self, auth_base_url: &str, tickets_base_url: &str) -> Self {
        self.auth_base_url = auth_base_url.to_owned();
        self.tickets_base_url = tickets_base_url.to_owned();
        self
    }
}

/// Authenticated client for the Lidl Plus tickets API.
pub struct LidlClient {
    client: Client,
    tickets_base: Url,
    language: String,
    country: String,
    access_token: String,
    refresh_token: String,
}

impl LidlClient {
    /// Authenticates with a refresh token from a previous login.
    ///
    /// # Errors
    ///
    /// - [`LidlError::Auth`] if the account server rejects the token.
    /// - [`LidlError::Http`] on network failure.
    /// - [`LidlError::InvalidBaseUrl`] if a configured base URL does not parse.
    pub async fn from_refresh_token(
        settings: &LidlSettings,
        refresh_token: &str,
    ) -> Result<Self, LidlError> {
        let client = build_http_client(settings)?;
        let auth_base = parse_base_url(&settings.auth_base_url)?;
        let tokens = auth::refresh(&client, &auth_base, refresh_token).await?;
        Self::from_tokens(client, settings, tokens, Some(refresh_token))
    }

    /// Runs the interactive phone login.
    ///
    /// Submits the account credentials to request an SMS verification code,
    /// then calls `prompt` to obtain that code from the operator and
    /// exchanges everything for tokens. This flow approximates the app's
    /// browser-based sign-in and may be refused; prefer
    /// [`LidlClient::from_refresh_token`] when a token is available. The issued refresh token is
    /// available through [`LidlClient::refresh_token`] for reuse.
    ///
    /// # Errors
    ///
    /// - [`LidlError::Auth`] if the credentials or code are rejected, or the
    ///   server issues no refresh token.
    /// - [`LidlError::Prompt`] if `prompt` fails.
    /// - [`LidlError::Http`] on network failure.
    pub async fn login<F>(
        settings: &LidlSettings,
        phone: &str,
        password: &str,
        prompt: F,
    ) -> Result<Self, LidlError>
    where
        F: FnOnce() -> std::io::Result<String>,
    {
        let client = build_http_client(settings)?;
        let auth_base = parse_base_url(&settings.auth_base_url)?;

        auth::request_verification_code(&client, &auth_base, settings, phone, password).await?;
        let code = prompt().map_err(LidlError::Prompt)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(LidlError::Auth("empty verification code".into()));
        }

        let tokens = auth::password_grant(&client, &auth_base, phone, password, code).await?;
        Self::from_tokens(client, settings, tokens, None)
    }

    fn from_tokens(
        client: Client,
        settings: &LidlSettings,
        tokens: auth::TokenResponse,
        previous_refresh_token: Option<&str>,
    ) -> Result<Self, LidlError> {
        let refresh_token = tokens
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh_token.map(str::to_owned))
            .ok_or_else(|| LidlError::Auth("no refresh token issued".into()))?;

        Ok(Self {
            client,
            tickets_base: parse_base_url(&settings.tickets_base_url)?,
            language: settings.language.clone(),
            country: settings.country.clone(),
            access_token: tokens.access_token,
            refresh_token,
        })
    }

    /// The refresh token to persist for non-interactive runs. May differ from
    /// the one passed in when the server rotates tokens.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Lists every ticket on the account, following pagination.
    ///
    /// Stops at the first empty page or once `totalCount` tickets have been
    /// collected.
    ///
    /// # Errors
    ///
    /// - [`LidlError::PaginationLimit`] after [`MAX_TICKET_PAGES`] pages.
    /// - [`LidlError::Auth`] on HTTP 401/403.
    /// - [`LidlError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`LidlError::Http`] / [`LidlError::Deserialize`] on transport or
    ///   body errors.
    pub async fn list_receipts(&self) -> Result<Vec<ReceiptSummary>, LidlError> {
        let mut receipts = Vec::new();

        for page_number in 1..=MAX_TICKET_PAGES {
            let page = self.fetch_tickets_page(page_number).await?;
            let page_len = page.tickets.len();
            tracing::debug!(
                page = page_number,
                tickets = page_len,
                total = page.total_count,
                page_size = page.size,
                "fetched ticket page"
            );

            receipts.extend(page.tickets);
            if page_len == 0 || receipts.len() as u64 >= page.total_count {
                return Ok(receipts);
            }
        }

        Err(LidlError::PaginationLimit {
            max_pages: MAX_TICKET_PAGES,
        })
    }

    /// Fetches one page of the ticket list (1-based).
    ///
    /// # Errors
    ///
    /// Same as [`LidlClient::list_receipts`], minus the pagination limit.
    pub async fn fetch_tickets_page(&self, page_number: u32) -> Result<TicketsPage, LidlError> {
        let mut url = self.tickets_url(&["tickets"])?;
        url.query_pairs_mut()
            .append_pair("pageNumber", &page_number.to_string())
            .append_pair("onlyFavorite", "false");

        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| LidlError::Deserialize {
            context: format!("tickets page {page_number}"),
            source: e,
        })
    }

    /// Fetches a single ticket with its line items.
    ///
    /// When the response omits the ticket id, `receipt_id` is filled in so
    /// normalized records stay keyed on the receipt.
    ///
    /// # Errors
    ///
    /// - [`LidlError::Auth`] on HTTP 401/403.
    /// - [`LidlError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`LidlError::Http`] / [`LidlError::Deserialize`] on transport or
    ///   body errors.
    pub async fn receipt_detail(&self, receipt_id: &str) -> Result<ReceiptDetail, LidlError> {
        let url = self.tickets_url(&["tickets", receipt_id])?;
        let body = self.get_text(url).await?;
        let mut detail: ReceiptDetail =
            serde_json::from_str(&body).map_err(|e| LidlError::Deserialize {
                context: format!("ticket {receipt_id}"),
                source: e,
            })?;
        detail.id.get_or_insert_with(|| receipt_id.to_owned());
        Ok(detail)
    }

    /// `{tickets_base}/{country}/{segments...}` with each segment
    /// percent-encoded.
    pub(crate) fn tickets_url(&self, segments: &[&str]) -> Result<Url, LidlError> {
        let mut url = self.tickets_base.clone();
        url.path_segments_mut()
            .map_err(|()| LidlError::InvalidBaseUrl {
                url: self.tickets_base.to_string(),
                reason: "cannot be a base".into(),
            })?
            .pop_if_empty()
            .push(&self.country)
            .extend(segments);
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, LidlError> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.language)
            .header("App", APP_ID)
            .header("App-Version", APP_VERSION)
            .header("Operating-System", OPERATING_SYSTEM)
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.text().await?)
    }
}

fn build_http_client(settings: &LidlSettings) -> Result<Client, LidlError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(&settings.user_agent)
        .build()?)
}

/// Parses a base URL, normalising it to end with exactly one slash so joins
/// append rather than replace the last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, LidlError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| LidlError::InvalidBaseUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// Maps 401/403 to [`LidlError::Auth`] and other non-2xx statuses to
/// [`LidlError::UnexpectedStatus`].
fn check_status(response: Response) -> Result<Response, LidlError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(LidlError::Auth(format!(
            "HTTP {} from {}",
            status.as_u16(),
            response.url()
        )));
    }
    if !status.is_success() {
        return Err(LidlError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
