//! Device API unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cloudlink::authn::access_token::{AccessToken, TokenState};
use cloudlink::authn::token_mngr::{TokenManager, TokenManagerExt};
use cloudlink::errors::ApiError;
use cloudlink::http::client::HttpClient;
use cloudlink::http::devices::DeviceApi;
use mockito::{Matcher, Server};
use secrecy::SecretString;
use serde_json::json;

/// Hands out `stale` until the first refresh, `fresh` after
struct FakeTokens {
    current: Mutex<String>,
    refreshes: AtomicUsize,
}

impl FakeTokens {
    fn new() -> Self {
        Self {
            current: Mutex::new("stale".to_string()),
            refreshes: AtomicUsize::new(0),
        }
    }

    fn token(&self) -> AccessToken {
        let raw = self.current.lock().unwrap().clone();
        AccessToken::new(raw, Utc::now() + chrono::Duration::hours(1))
    }
}

#[async_trait]
impl TokenManagerExt for FakeTokens {
    async fn get_token(&self) -> Result<AccessToken, ApiError> {
        Ok(self.token())
    }

    async fn refresh_token(&self) -> Result<AccessToken, ApiError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = "fresh".to_string();
        Ok(self.token())
    }

    async fn state(&self) -> TokenState {
        TokenState::Valid
    }

    async fn has_token(&self) -> bool {
        true
    }
}

fn api_with(url: &str, timeout: Duration, tokens: Arc<dyn TokenManagerExt>) -> DeviceApi {
    let http_client = Arc::new(HttpClient::catgenie(url, timeout).unwrap());
    DeviceApi::new(http_client, tokens)
}

const STATUS_PATH: &str = "/device/management/CG-1/operation/status";

#[tokio::test]
async fn test_rejected_call_is_retried_once_with_fresh_token() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", STATUS_PATH)
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", STATUS_PATH)
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(json!({"state": 0, "progress": 0, "error": ""}).to_string())
        .expect(1)
        .create_async()
        .await;
    let tokens = Arc::new(FakeTokens::new());
    let api = api_with(&server.url(), Duration::from_secs(5), tokens.clone());

    let status = api.get_device_status("CG-1").await.unwrap();

    assert_eq!(status.state, 0);
    assert_eq!(tokens.refreshes.load(Ordering::SeqCst), 1);
    rejected.assert_async().await;
    accepted.assert_async().await;
}

#[tokio::test]
async fn test_second_rejection_is_returned_without_looping() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", STATUS_PATH)
        .with_status(403)
        .expect(2)
        .create_async()
        .await;
    let tokens = Arc::new(FakeTokens::new());
    let api = api_with(&server.url(), Duration::from_secs(5), tokens.clone());

    let result = api.get_device_status("CG-1").await;

    assert!(matches!(result, Err(ApiError::Authentication(_))));
    assert_eq!(tokens.refreshes.load(Ordering::SeqCst), 1);
    rejected.assert_async().await;
}

#[tokio::test]
async fn test_other_errors_are_not_retried() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("GET", STATUS_PATH)
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create_async()
        .await;
    let tokens = Arc::new(FakeTokens::new());
    let api = api_with(&server.url(), Duration::from_secs(5), tokens.clone());

    let result = api.get_device_status("CG-1").await;

    assert!(matches!(result, Err(ApiError::Api(ref msg)) if msg.contains("boom")));
    assert_eq!(tokens.refreshes.load(Ordering::SeqCst), 0);
    failing.assert_async().await;
}

#[tokio::test]
async fn test_first_call_refreshes_token_without_bearer() {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/facade/v1/mobile-user/refreshToken")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({"refreshToken": "r-token"})))
        .with_status(200)
        .with_body(json!({"token": "access", "expiration": "4102444800000"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let devices = server
        .mock("GET", "/device/device")
        .match_header("authorization", "Bearer access")
        .with_status(200)
        .with_body(
            json!({"thingList": [
                {"macAddress": "AA:BB", "manufacturerId": "CG-1", "reportedStatus": "connected"},
                {"macAddress": "CC:DD", "manufacturerId": "CG-2"}
            ]})
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;
    let http_client = Arc::new(HttpClient::catgenie(&server.url(), Duration::from_secs(5)).unwrap());
    let token_mngr = Arc::new(TokenManager::new(
        http_client.clone(),
        SecretString::from("r-token".to_string()),
    ));
    let api = DeviceApi::new(http_client, token_mngr.clone());

    let all = api.get_devices().await.unwrap();
    let first = api.get_first_device().await.unwrap();

    assert_eq!(all.len(), 2);
    assert_eq!(first.manufacturer_id, "CG-1");
    assert!(first.is_connected());
    assert_eq!(token_mngr.state().await, TokenState::Valid);
    refresh.assert_async().await;
    devices.assert_async().await;
}

#[tokio::test]
async fn test_empty_device_list_is_api_error() {
    let mut server = Server::new_async().await;
    let _devices = server
        .mock("GET", "/device/device")
        .with_status(200)
        .with_body(r#"{"thingList": []}"#)
        .create_async()
        .await;
    let api = api_with(&server.url(), Duration::from_secs(5), Arc::new(FakeTokens::new()));

    let result = api.get_first_device().await;

    assert!(matches!(result, Err(ApiError::Api(_))));
}

#[tokio::test]
async fn test_timeout_is_communication_error() {
    // Accepts connections into the backlog but never answers
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let api = api_with(&url, Duration::from_millis(200), Arc::new(FakeTokens::new()));

    let result = api.get_device_status("CG-1").await;

    assert!(matches!(result, Err(ApiError::Communication(_))));
    drop(listener);
}

#[tokio::test]
async fn test_send_operation() {
    let mut server = Server::new_async().await;
    let operation = server
        .mock("POST", "/device/management/CG-1/operation")
        .match_header("authorization", "Bearer stale")
        .match_body(Matcher::Json(json!({"state": 1})))
        .with_status(200)
        .with_body("")
        .expect(1)
        .create_async()
        .await;
    let api = api_with(&server.url(), Duration::from_secs(5), Arc::new(FakeTokens::new()));

    let response = api
        .send_operation("CG-1", cloudlink::http::devices::DEFAULT_OPERATION_STATE)
        .await
        .unwrap();

    assert!(response.is_null());
    operation.assert_async().await;
}
