//! Integration tests for `LidlClient` using wiremock HTTP mocks.
//!
//! One mock server plays both the accounts server (under `/auth`) and the
//! tickets API (under `/tickets-api`).

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pantrysync_lidl::{LidlClient, LidlError, LidlSettings};

/// `base64("LidlPlusNativeClient:secret")`
const BASIC_AUTH: &str = "Basic TGlkbFBsdXNOYXRpdmVDbGllbnQ6c2VjcmV0";

fn test_settings(server: &MockServer) -> LidlSettings {
    LidlSettings::new("nl", "BE", 5, "pantrysync-test/0.1").with_base_urls(
        &format!("{}/auth", server.uri()),
        &format!("{}/tickets-api", server.uri()),
    )
}

async fn mount_refresh_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/connect/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

async fn authenticated_client(server: &MockServer) -> LidlClient {
    mount_refresh_ok(server).await;
    LidlClient::from_refresh_token(&test_settings(server), "stored-refresh")
        .await
        .expect("refresh should succeed")
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_keeps_existing_token_when_not_rotated() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;
    assert_eq!(client.refresh_token(), "stored-refresh");
}

#[tokio::test]
async fn refresh_adopts_rotated_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-2",
            "refresh_token": "rotated-refresh"
        })))
        .mount(&server)
        .await;

    let client = LidlClient::from_refresh_token(&test_settings(&server), "stored-refresh")
        .await
        .expect("refresh should succeed");
    assert_eq!(client.refresh_token(), "rotated-refresh");
}

#[tokio::test]
async fn refresh_rejected_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/connect/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let result = LidlClient::from_refresh_token(&test_settings(&server), "expired").await;
    assert!(
        matches!(result, Err(LidlError::Auth(ref msg)) if msg.contains("invalid_grant")),
        "expected Auth error"
    );
}

#[tokio::test]
async fn refresh_server_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/connect/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = LidlClient::from_refresh_token(&test_settings(&server), "stored-refresh").await;
    assert!(matches!(
        result,
        Err(LidlError::UnexpectedStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn login_exchanges_verification_code_for_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api/phone/login"))
        .and(body_string_contains("+32470000000"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/connect/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("otp=123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "fresh-refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LidlClient::login(&test_settings(&server), "+32470000000", "pw", || {
        Ok(" 123456\n".to_string())
    })
    .await
    .expect("login should succeed");

    assert_eq!(client.refresh_token(), "fresh-refresh");
}

#[tokio::test]
async fn login_rejected_credentials_never_prompts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api/phone/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_credentials"
        })))
        .mount(&server)
        .await;

    let result = LidlClient::login(&test_settings(&server), "+32470000000", "wrong", || {
        panic!("prompt must not run when login is rejected")
    })
    .await;

    assert!(matches!(result, Err(LidlError::Auth(_))));
}

#[tokio::test]
async fn login_with_empty_code_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api/phone/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = LidlClient::login(&test_settings(&server), "+32470000000", "pw", || {
        Ok("   ".to_string())
    })
    .await;

    assert!(matches!(result, Err(LidlError::Auth(ref msg)) if msg.contains("verification code")));
}

#[tokio::test]
async fn login_without_refresh_token_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api/phone/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1"
        })))
        .mount(&server)
        .await;

    let result = LidlClient::login(&test_settings(&server), "+32470000000", "pw", || {
        Ok("123456".to_string())
    })
    .await;

    assert!(matches!(result, Err(LidlError::Auth(ref msg)) if msg.contains("no refresh token")));
}

#[tokio::test]
async fn login_prompt_failure_is_prompt_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/api/phone/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = LidlClient::login(&test_settings(&server), "+32470000000", "pw", || {
        Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "stdin closed",
        ))
    })
    .await;

    assert!(matches!(result, Err(LidlError::Prompt(_))));
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_receipts_sends_app_headers_and_bearer_token() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("onlyFavorite", "false"))
        .and(header("authorization", "Bearer access-1"))
        .and(header("accept-language", "nl"))
        .and(header("app", "com.lidl.eci.lidl.plus"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [
                { "id": "T-1", "date": "2024-03-02T10:41:00+00:00", "totalAmount": 12.5 },
                { "id": "T-2" }
            ],
            "totalCount": 2,
            "size": 25,
            "page": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipts = client.list_receipts().await.expect("listing should succeed");

    let ids: Vec<&str> = receipts.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["T-1", "T-2"]);
    assert_eq!(
        receipts[0].date.as_deref(),
        Some("2024-03-02T10:41:00+00:00")
    );
}

#[tokio::test]
async fn list_receipts_follows_pages_until_total_reached() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets"))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [{ "id": "T-1" }, { "id": "T-2" }],
            "totalCount": 3,
            "size": 2
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets"))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [{ "id": "T-3" }],
            "totalCount": 3,
            "size": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipts = client.list_receipts().await.expect("listing should succeed");
    assert_eq!(receipts.len(), 3);
    assert_eq!(receipts[2].id, "T-3");
}

#[tokio::test]
async fn list_receipts_empty_account_returns_empty_vec() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tickets": [],
            "totalCount": 0,
            "size": 25
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipts = client.list_receipts().await.expect("listing should succeed");
    assert!(receipts.is_empty());
}

#[tokio::test]
async fn list_receipts_expired_token_is_auth_error() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_receipts().await;
    assert!(matches!(result, Err(LidlError::Auth(_))));
}

#[tokio::test]
async fn list_receipts_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.list_receipts().await;
    assert!(matches!(result, Err(LidlError::Deserialize { .. })));
}

#[tokio::test]
async fn receipt_detail_returns_items() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets/T-1"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "T-1",
            "items": [
                { "name": "Milbona Yoghurt", "currentUnitPrice": "0,89", "quantity": "1", "taxGroupName": "A" },
                { "name": "Bananen", "currentUnitPrice": "1,79", "quantity": "0,962", "unit": "kg" }
            ]
        })))
        .mount(&server)
        .await;

    let detail = client.receipt_detail("T-1").await.expect("detail should parse");
    assert_eq!(detail.id.as_deref(), Some("T-1"));
    assert_eq!(detail.items.len(), 2);
}

#[tokio::test]
async fn receipt_detail_fills_missing_id() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets/T-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let detail = client.receipt_detail("T-9").await.expect("detail should parse");
    assert_eq!(detail.id.as_deref(), Some("T-9"));
    assert!(detail.items.is_empty());
}

#[tokio::test]
async fn receipt_detail_not_found_is_unexpected_status() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/tickets-api/BE/tickets/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.receipt_detail("missing").await;
    assert!(matches!(
        result,
        Err(LidlError::UnexpectedStatus { status: 404, .. })
    ));
}
