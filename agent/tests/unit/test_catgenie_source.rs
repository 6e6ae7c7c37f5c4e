//! CatGenie coordinator unit tests

use std::sync::Arc;
use std::time::Duration;

use cloudlink::authn::token_mngr::TokenManager;
use cloudlink::coordinator::catgenie::CatGenieSource;
use cloudlink::coordinator::{Coordinator, DataSource};
use cloudlink::errors::UpdateError;
use cloudlink::http::client::HttpClient;
use cloudlink::http::devices::DeviceApi;
use mockito::{Mock, Server, ServerGuard};
use secrecy::SecretString;
use serde_json::json;

const STATUS_PATH: &str = "/device/management/CG-1/operation/status";

fn coordinator(url: &str) -> Coordinator<CatGenieSource> {
    let http_client = Arc::new(HttpClient::catgenie(url, Duration::from_secs(5)).unwrap());
    let token_mngr = Arc::new(TokenManager::new(
        http_client.clone(),
        SecretString::from("r-token".to_string()),
    ));
    Coordinator::new(
        "catgenie",
        Duration::from_secs(15),
        CatGenieSource::new(DeviceApi::new(http_client, token_mngr)),
    )
}

async fn mock_refresh(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", "/facade/v1/mobile-user/refreshToken")
        .with_status(200)
        .with_body(json!({"token": "access", "expiration": 4102444800000i64}).to_string())
        .expect(hits)
        .create_async()
        .await
}

async fn mock_devices(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/device/device")
        .with_status(200)
        .with_body(
            json!({"thingList": [{
                "macAddress": "AA:BB", "manufacturerId": "CG-1", "name": "Box",
                "fwVersion": "2.1", "reportedStatus": "connected"
            }]})
            .to_string(),
        )
        .create_async()
        .await
}

#[tokio::test]
async fn test_first_refresh_selects_device_and_reads_status() {
    let mut server = Server::new_async().await;
    let refresh = mock_refresh(&mut server, 1).await;
    let _devices = mock_devices(&mut server).await;
    let _status = server
        .mock("GET", STATUS_PATH)
        .match_header("authorization", "Bearer access")
        .with_status(200)
        .with_body(json!({"state": 2, "progress": 50, "error": "", "mode": 1}).to_string())
        .create_async()
        .await;
    let coordinator = coordinator(&server.url());

    let data = coordinator.first_refresh().await.unwrap();

    assert_eq!(data.state, 2);
    assert_eq!(data.progress, 50);
    assert!(data.is_running());
    assert!(!data.has_problem());
    let device = coordinator.source().device().await.unwrap();
    assert_eq!(device.mac_address, "AA:BB");
    assert_eq!(device.fw_version.as_deref(), Some("2.1"));
    assert!(coordinator.last_update_success().await);
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_fetch_before_setup_fails() {
    let coordinator = coordinator("http://127.0.0.1:1");

    let result = coordinator.source().fetch().await;

    assert!(matches!(result, Err(UpdateError::UpdateFailed(_))));
}

#[tokio::test]
async fn test_rejected_credentials_are_auth_failed() {
    let mut server = Server::new_async().await;
    // Once at setup, once for the retry
    let refresh = mock_refresh(&mut server, 2).await;
    let _devices = mock_devices(&mut server).await;
    let status = server
        .mock("GET", STATUS_PATH)
        .with_status(401)
        .expect(2)
        .create_async()
        .await;
    let coordinator = coordinator(&server.url());

    let err = coordinator.first_refresh().await.unwrap_err();

    assert!(matches!(err, UpdateError::AuthFailed(_)));
    assert!(err.is_fatal());
    assert!(coordinator.data().is_none());
    refresh.assert_async().await;
    status.assert_async().await;
}

#[tokio::test]
async fn test_failed_poll_keeps_previous_snapshot() {
    let mut server = Server::new_async().await;
    let _refresh = mock_refresh(&mut server, 1).await;
    let _devices = mock_devices(&mut server).await;
    let ok = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(json!({"state": 0, "error": "E1"}).to_string())
        .create_async()
        .await;
    let coordinator = coordinator(&server.url());
    coordinator.first_refresh().await.unwrap();

    ok.remove_async().await;
    let _failing = server
        .mock("GET", STATUS_PATH)
        .with_status(502)
        .create_async()
        .await;

    let err = coordinator.refresh().await.unwrap_err();

    assert!(matches!(err, UpdateError::UpdateFailed(_)));
    let data = coordinator.data().unwrap();
    assert_eq!(data.error, "E1");
    assert!(data.has_problem());
    let status = coordinator.status().await;
    assert!(!status.last_update_success);
    assert!(status.last_updated.is_some());
}

#[tokio::test]
async fn test_failed_token_refresh_aborts_setup() {
    let mut server = Server::new_async().await;
    let _refresh = server
        .mock("POST", "/facade/v1/mobile-user/refreshToken")
        .with_status(401)
        .create_async()
        .await;
    let devices = server
        .mock("GET", "/device/device")
        .expect(0)
        .create_async()
        .await;
    let coordinator = coordinator(&server.url());

    let err = coordinator.first_refresh().await.unwrap_err();

    assert!(matches!(err, UpdateError::AuthFailed(_)));
    assert!(coordinator.source().device().await.is_none());
    devices.assert_async().await;
}
