//! Token exchange against the Lidl accounts server.
//!
//! Every token request carries the app's client credentials as HTTP Basic
//! auth. The refresh grant is the one the mobile app uses. The phone login
//! (`api/phone/login` followed by a password grant with an `otp` field) is a
//! best-effort approximation: the app itself signs in through a browser
//! OAuth flow, so this path may be rejected. A refresh token obtained
//! elsewhere always works through [`refresh`].

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;

use crate::client::LidlSettings;
use crate::error::LidlError;

const CLIENT_ID: &str = "LidlPlusNativeClient";
const CLIENT_SECRET: &str = "secret";
const SCOPE: &str = "openid profile offline_access lpprofile lpapis";

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Exchanges a refresh token for a fresh access token.
pub(crate) async fn refresh(
    client: &Client,
    auth_base: &Url,
    refresh_token: &str,
) -> Result<TokenResponse, LidlError> {
    token_request(
        client,
        auth_base,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

/// Submits phone and password, expecting the server to send an SMS code.
/// Unverified against the live service.
pub(crate) async fn request_verification_code(
    client: &Client,
    auth_base: &Url,
    settings: &LidlSettings,
    phone: &str,
    password: &str,
) -> Result<(), LidlError> {
    let url = join(auth_base, "api/phone/login")?;
    let response = client
        .post(url.clone())
        .json(&json!({
            "phone": phone,
            "password": password,
            "language": settings.language,
            "country": settings.country,
        }))
        .send()
        .await?;

    let status = response.status();
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        return Err(LidlError::Auth(format!(
            "login rejected (HTTP {}): {}",
            status.as_u16(),
            describe_error(&body)
        )));
    }
    if !status.is_success() {
        return Err(LidlError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}

/// Exchanges credentials plus the SMS verification code for tokens.
pub(crate) async fn password_grant(
    client: &Client,
    auth_base: &Url,
    phone: &str,
    password: &str,
    code: &str,
) -> Result<TokenResponse, LidlError> {
    token_request(
        client,
        auth_base,
        &[
            ("grant_type", "password"),
            ("username", phone),
            ("password", password),
            ("otp", code),
            ("scope", SCOPE),
        ],
    )
    .await
}

async fn token_request(
    client: &Client,
    auth_base: &Url,
    form: &[(&str, &str)],
) -> Result<TokenResponse, LidlError> {
    let url = join(auth_base, "connect/token")?;
    let response = client
        .post(url.clone())
        .basic_auth(CLIENT_ID, Some(CLIENT_SECRET))
        .form(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if status.is_client_error() {
        return Err(LidlError::Auth(format!(
            "token request rejected (HTTP {}): {}",
            status.as_u16(),
            describe_error(&body)
        )));
    }
    if !status.is_success() {
        return Err(LidlError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|e| LidlError::Deserialize {
        context: "token response".to_string(),
        source: e,
    })
}

fn join(base: &Url, path: &str) -> Result<Url, LidlError> {
    base.join(path).map_err(|e| LidlError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Pulls `error_description` or `error` out of an OAuth error body, falling
/// back to the raw body.
fn describe_error(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("error"))
                .and_then(serde_json::Value::as_str)
        })
        .map_or_else(|| body.trim().to_string(), str::to_string)
}
