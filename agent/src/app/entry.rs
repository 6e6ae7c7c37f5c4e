//! Integration entry: setup, unload and reload of one configured instance

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::app::options::{AppOptions, LifecycleOptions, ServerOptions};
use crate::app::state::AppState;
use crate::coordinator::{Coordinator, DataSource};
use crate::errors::AgentError;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::workers::poller::{self, PollerExit};

/// A running instance: coordinators, their pollers and the host API
pub struct IntegrationEntry {
    state: Arc<AppState>,
    shutdown_manager: ShutdownManager,
}

impl IntegrationEntry {
    /// Build everything, refresh each coordinator once, then start polling
    ///
    /// A failed first refresh aborts the setup and returns its error; nothing
    /// is left running.
    pub async fn setup(options: AppOptions) -> Result<Self, AgentError> {
        info!("Setting up integration entry...");

        let AppOptions {
            lifecycle,
            catgenie,
            switchbot,
            enable_socket_server,
            server,
        } = options;

        let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
        let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), lifecycle);

        let state = Arc::new(AppState::init(catgenie, switchbot)?);

        if let Err(e) = init(
            &state,
            enable_socket_server,
            &server,
            &shutdown_tx,
            &mut shutdown_manager,
        )
        .await
        {
            error!("Failed to set up integration entry: {}", e);
            shutdown_manager.shutdown().await?;
            return Err(e);
        }

        info!("Integration entry set up");
        Ok(Self {
            state,
            shutdown_manager,
        })
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Stop pollers and the host API
    pub async fn unload(mut self) -> Result<(), AgentError> {
        info!("Unloading integration entry...");
        self.shutdown_manager.shutdown().await
    }

    /// Unload, then set up again with new options
    pub async fn reload(self, options: AppOptions) -> Result<Self, AgentError> {
        info!("Reloading integration entry...");
        self.unload().await?;
        Self::setup(options).await
    }
}

async fn init(
    state: &Arc<AppState>,
    enable_socket_server: bool,
    server: &ServerOptions,
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), AgentError> {
    state.catgenie.first_refresh().await?;
    if let Some(vacuum) = &state.vacuum {
        vacuum.coordinator().first_refresh().await?;
    }

    init_poller(state.catgenie.clone(), shutdown_manager, shutdown_tx.subscribe())?;
    if let Some(vacuum) = &state.vacuum {
        init_poller(
            vacuum.coordinator().clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )?;
    }

    if enable_socket_server {
        init_socket_server(server, state, shutdown_manager, shutdown_tx.subscribe()).await?;
    }

    Ok(())
}

fn init_poller<D: DataSource + 'static>(
    coordinator: Arc<Coordinator<D>>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), AgentError> {
    info!("Initializing poller for {}...", coordinator.name());

    let name = coordinator.name().to_string();
    let options = poller::Options {
        interval: coordinator.update_interval(),
    };

    let handle = tokio::spawn(async move {
        poller::run(
            &options,
            coordinator.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await
    });

    shutdown_manager.with_poller_handle(name, handle)
}

async fn init_socket_server(
    options: &ServerOptions,
    state: &Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), AgentError> {
    info!("Initializing local HTTP server...");

    let server_state = ServerState::from(state.as_ref());

    let server_handle = serve(options, Arc::new(server_state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_socket_server_handle(server_handle)
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    lifecycle_options: LifecycleOptions,
    poller_handles: Vec<(String, JoinHandle<PollerExit>)>,
    socket_server_handle: Option<JoinHandle<Result<(), AgentError>>>,
}

impl ShutdownManager {
    fn new(shutdown_tx: broadcast::Sender<()>, lifecycle_options: LifecycleOptions) -> Self {
        Self {
            shutdown_tx,
            lifecycle_options,
            poller_handles: Vec::new(),
            socket_server_handle: None,
        }
    }

    fn with_poller_handle(
        &mut self,
        name: String,
        handle: JoinHandle<PollerExit>,
    ) -> Result<(), AgentError> {
        if self.poller_handles.iter().any(|(n, _)| *n == name) {
            return Err(AgentError::ShutdownError(format!(
                "poller {} already set",
                name
            )));
        }
        self.poller_handles.push((name, handle));
        Ok(())
    }

    fn with_socket_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), AgentError>>,
    ) -> Result<(), AgentError> {
        if self.socket_server_handle.is_some() {
            return Err(AgentError::ShutdownError("server_handle already set".to_string()));
        }
        self.socket_server_handle = Some(handle);
        Ok(())
    }

    /// Signal every task and wait for them, aborting what is still running
    /// after `max_shutdown_delay`
    async fn shutdown(&mut self) -> Result<(), AgentError> {
        let _ = self.shutdown_tx.send(());

        let max_delay = self.lifecycle_options.max_shutdown_delay;
        let result = tokio::time::timeout(max_delay, self.join_all()).await;

        match result {
            Ok(result) => result,
            Err(_) => {
                error!("Shutdown timed out after {:?}, aborting tasks...", max_delay);
                self.abort_all();
                Err(AgentError::ShutdownError(format!(
                    "timed out after {:?}",
                    max_delay
                )))
            }
        }
    }

    async fn join_all(&mut self) -> Result<(), AgentError> {
        // 1. Pollers
        for (name, handle) in self.poller_handles.iter_mut() {
            match handle.await {
                Ok(PollerExit::Shutdown) => {}
                Ok(PollerExit::AuthFailed(msg)) => {
                    warn!("Poller {} had stopped on authentication failure: {}", name, msg);
                }
                Err(e) => return Err(AgentError::ShutdownError(e.to_string())),
            }
        }
        self.poller_handles.clear();

        // 2. Socket server
        if let Some(handle) = self.socket_server_handle.as_mut() {
            handle.await.map_err(|e| AgentError::ShutdownError(e.to_string()))??;
        }
        self.socket_server_handle = None;

        info!("Shutdown complete");
        Ok(())
    }

    fn abort_all(&mut self) {
        for (_, handle) in self.poller_handles.drain(..) {
            handle.abort();
        }
        if let Some(handle) = self.socket_server_handle.take() {
            handle.abort();
        }
    }
}
