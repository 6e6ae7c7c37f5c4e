//! Main application run loop

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::app::entry::IntegrationEntry;
use crate::app::options::AppOptions;
use crate::errors::AgentError;

/// Host lifecycle requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Shutdown,
    Reload,
}

/// Run the agent until a shutdown is requested
///
/// `load_options` is called once at startup and again on every reload. A
/// reload whose options fail to load keeps the running entry untouched. A
/// reload whose setup fails leaves no entry running; setup is then retried
/// every `setup_retry_delay` with freshly loaded options until it succeeds
/// or a shutdown arrives.
pub async fn run<L, F>(
    load_options: L,
    mut events: mpsc::Receiver<LifecycleEvent>,
) -> Result<(), AgentError>
where
    L: Fn() -> F,
    F: Future<Output = Result<AppOptions, AgentError>>,
{
    info!("Initializing cloudlink...");

    let options = load_options().await?;
    let mut retry_delay = options.lifecycle.setup_retry_delay;
    let mut entry = Some(IntegrationEntry::setup(options).await?);

    loop {
        let event = match entry {
            Some(_) => events.recv().await,
            None => tokio::select! {
                event = events.recv() => event,
                _ = tokio::time::sleep(retry_delay) => {
                    info!("Retrying integration entry setup...");
                    Some(LifecycleEvent::Reload)
                }
            },
        };

        match event {
            Some(LifecycleEvent::Reload) => {
                info!("Reload requested, re-reading settings...");
                let options = match load_options().await {
                    Ok(options) => options,
                    Err(e) => {
                        error!("Keeping the current configuration: {}", e);
                        continue;
                    }
                };
                retry_delay = options.lifecycle.setup_retry_delay;

                let result = match entry.take() {
                    Some(current) => current.reload(options).await,
                    None => IntegrationEntry::setup(options).await,
                };
                match result {
                    Ok(reloaded) => entry = Some(reloaded),
                    Err(e) => warn!("Setup failed, retrying in {:?}: {}", retry_delay, e),
                }
            }
            Some(LifecycleEvent::Shutdown) => {
                info!("Shutdown signal received, shutting down...");
                break;
            }
            None => {
                info!("Lifecycle channel closed, shutting down...");
                break;
            }
        }
    }

    match entry {
        Some(entry) => entry.unload().await,
        None => Ok(()),
    }
}
