//! Polling worker driving one coordinator

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::coordinator::{Coordinator, DataSource};
use crate::errors::UpdateError;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Time between two refreshes
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
        }
    }
}

/// Why a poller stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerExit {
    Shutdown,
    /// Credentials were rejected; polling resumes only after a reload
    AuthFailed(String),
}

/// Run the poller worker
///
/// The first refresh is expected to have happened during setup, so the
/// loop sleeps before each refresh.
pub async fn run<D, S, F>(
    options: &Options,
    coordinator: &Coordinator<D>,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> PollerExit
where
    D: DataSource,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!(
        "Poller for {} starting (every {:?})...",
        coordinator.name(),
        options.interval
    );

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller for {} shutting down...", coordinator.name());
                return PollerExit::Shutdown;
            }
            _ = sleep_fn(options.interval) => {}
        }

        debug!("Refreshing {}...", coordinator.name());

        match coordinator.refresh().await {
            Ok(_) => {}
            Err(UpdateError::AuthFailed(msg)) => {
                error!(
                    "Authentication failed for {}, re-authentication required: {}",
                    coordinator.name(),
                    msg
                );
                return PollerExit::AuthFailed(msg);
            }
            Err(e) => {
                warn!("Error updating {}: {}", coordinator.name(), e);
            }
        }
    }
}
