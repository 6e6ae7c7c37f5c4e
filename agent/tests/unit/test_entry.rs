//! Integration entry lifecycle tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cloudlink::app::entry::IntegrationEntry;
use cloudlink::app::options::{AppOptions, CatGenieOptions, SwitchBotOptions};
use cloudlink::app::run::{run, LifecycleEvent};
use cloudlink::errors::{AgentError, UpdateError};
use cloudlink::vacuum::VacuumState;
use mockito::{Mock, Server, ServerGuard};
use secrecy::SecretString;
use serde_json::json;
use tokio::sync::mpsc;

fn options(catgenie_url: &str, switchbot_url: Option<&str>) -> AppOptions {
    let mut options = AppOptions::new(CatGenieOptions::new(
        catgenie_url,
        SecretString::from("r-token".to_string()),
    ));
    options.enable_socket_server = false;
    options.lifecycle.max_shutdown_delay = Duration::from_secs(5);
    options.switchbot = switchbot_url.map(|url| SwitchBotOptions {
        base_url: url.to_string(),
        token: SecretString::from("token".to_string()),
        secret: SecretString::from("secret".to_string()),
        device_id: "VAC1".to_string(),
        update_interval: Duration::from_secs(600),
        request_timeout: Duration::from_secs(5),
    });
    options
}

async fn mock_catgenie(server: &mut ServerGuard, refreshes: usize) -> Mock {
    let refresh = server
        .mock("POST", "/facade/v1/mobile-user/refreshToken")
        .with_status(200)
        .with_body(json!({"token": "access", "expiration": 4102444800000i64}).to_string())
        .expect(refreshes)
        .create_async()
        .await;
    server
        .mock("GET", "/device/device")
        .with_status(200)
        .with_body(json!({"thingList": [{"macAddress": "AA:BB", "manufacturerId": "CG-1"}]}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/device/management/CG-1/operation/status")
        .with_status(200)
        .with_body(json!({"state": 1, "progress": 10, "error": ""}).to_string())
        .create_async()
        .await;
    refresh
}

#[tokio::test]
async fn test_setup_refreshes_every_coordinator() {
    let mut catgenie = Server::new_async().await;
    let _refresh = mock_catgenie(&mut catgenie, 1).await;
    let mut switchbot = Server::new_async().await;
    let _status = switchbot
        .mock("GET", "/v1.1/devices/VAC1/status")
        .with_status(200)
        .with_body(
            json!({"statusCode": 100, "message": "success",
                   "body": {"battery": 100, "onlineStatus": "online", "workingStatus": "ChargeDone"}})
            .to_string(),
        )
        .create_async()
        .await;

    let entry = IntegrationEntry::setup(options(&catgenie.url(), Some(&switchbot.url())))
        .await
        .unwrap();

    assert_eq!(entry.state().catgenie.data().unwrap().state, 1);
    let vacuum = entry.state().vacuum.clone().unwrap();
    assert_eq!(vacuum.state(), Some(VacuumState::Docked));
    assert_eq!(vacuum.battery_level(), Some(100));

    entry.unload().await.unwrap();
}

#[tokio::test]
async fn test_setup_fails_on_rejected_refresh_token() {
    let mut catgenie = Server::new_async().await;
    let _refresh = catgenie
        .mock("POST", "/facade/v1/mobile-user/refreshToken")
        .with_status(403)
        .create_async()
        .await;

    let result = IntegrationEntry::setup(options(&catgenie.url(), None)).await;

    assert!(matches!(
        result,
        Err(AgentError::Update(UpdateError::AuthFailed(_)))
    ));
}

#[tokio::test]
async fn test_setup_fails_when_vacuum_is_unreachable() {
    let mut catgenie = Server::new_async().await;
    let _refresh = mock_catgenie(&mut catgenie, 1).await;

    let result = IntegrationEntry::setup(options(&catgenie.url(), Some("http://127.0.0.1:1"))).await;

    assert!(matches!(
        result,
        Err(AgentError::Update(UpdateError::UpdateFailed(_)))
    ));
}

#[tokio::test]
async fn test_run_reloads_then_shuts_down() {
    let mut catgenie = Server::new_async().await;
    // Each setup starts from a fresh token manager
    let refresh = mock_catgenie(&mut catgenie, 2).await;
    let url = catgenie.url();
    let loads = AtomicUsize::new(0);
    let (events_tx, events_rx) = mpsc::channel(4);

    events_tx.send(LifecycleEvent::Reload).await.unwrap();
    events_tx.send(LifecycleEvent::Shutdown).await.unwrap();

    run(
        || {
            loads.fetch_add(1, Ordering::SeqCst);
            let options = options(&url, None);
            async move { Ok::<_, AgentError>(options) }
        },
        events_rx,
    )
    .await
    .unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 2);
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_failed_reload_keeps_running_entry() {
    let mut catgenie = Server::new_async().await;
    let refresh = mock_catgenie(&mut catgenie, 1).await;
    let url = catgenie.url();
    let loads = AtomicUsize::new(0);
    let (events_tx, events_rx) = mpsc::channel(4);

    events_tx.send(LifecycleEvent::Reload).await.unwrap();
    drop(events_tx);

    run(
        || {
            let attempt = loads.fetch_add(1, Ordering::SeqCst);
            let options = options(&url, None);
            async move {
                if attempt == 0 {
                    Ok(options)
                } else {
                    Err(AgentError::ConfigError("broken settings".to_string()))
                }
            }
        },
        events_rx,
    )
    .await
    .unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 2);
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_reload_against_unreachable_cloud_keeps_running() {
    let mut catgenie = Server::new_async().await;
    let refresh = mock_catgenie(&mut catgenie, 1).await;
    let url = catgenie.url();
    let loads = AtomicUsize::new(0);
    let (events_tx, events_rx) = mpsc::channel(4);

    events_tx.send(LifecycleEvent::Reload).await.unwrap();
    events_tx.send(LifecycleEvent::Shutdown).await.unwrap();

    let result = run(
        || {
            let attempt = loads.fetch_add(1, Ordering::SeqCst);
            let options = if attempt == 0 {
                options(&url, None)
            } else {
                options("http://127.0.0.1:1", None)
            };
            async move { Ok::<_, AgentError>(options) }
        },
        events_rx,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(loads.load(Ordering::SeqCst), 2);
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_setup_is_retried_after_failed_reload() {
    let mut catgenie = Server::new_async().await;
    // Initial setup, then the retry after the failed reload
    let refresh = mock_catgenie(&mut catgenie, 2).await;
    let url = catgenie.url();
    let loads = AtomicUsize::new(0);
    let (events_tx, events_rx) = mpsc::channel(4);

    events_tx.send(LifecycleEvent::Reload).await.unwrap();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let _ = events_tx.send(LifecycleEvent::Shutdown).await;
    });

    let result = run(
        || {
            let attempt = loads.fetch_add(1, Ordering::SeqCst);
            let mut options = if attempt == 1 {
                options("http://127.0.0.1:1", None)
            } else {
                options(&url, None)
            };
            options.lifecycle.setup_retry_delay = Duration::from_millis(50);
            async move { Ok::<_, AgentError>(options) }
        },
        events_rx,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(loads.load(Ordering::SeqCst), 3);
    refresh.assert_async().await;
}
