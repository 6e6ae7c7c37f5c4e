//! Polling coordinators
//!
//! A coordinator owns one data source, keeps the latest snapshot it produced
//! and fans it out to subscribers. The host drives it by calling
//! [`Coordinator::first_refresh`] once and [`Coordinator::refresh`] on every
//! tick.

pub mod catgenie;
pub mod switchbot;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entity_models::models::CoordinatorStatus;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{debug, info};

use crate::errors::UpdateError;

/// Where a coordinator gets its data from
#[async_trait]
pub trait DataSource: Send + Sync {
    type Data: Send + Sync + 'static;

    /// One-time preparation before the first fetch
    async fn setup(&self) -> Result<(), UpdateError> {
        Ok(())
    }

    /// Fetch a fresh snapshot
    async fn fetch(&self) -> Result<Self::Data, UpdateError>;
}

/// Latest snapshot as seen by subscribers
pub type Snapshot<T> = Option<Arc<T>>;

#[derive(Debug, Default)]
struct RefreshStatus {
    last_update_success: bool,
    last_error: Option<UpdateError>,
    last_updated: Option<DateTime<Utc>>,
}

/// Polling coordinator over a data source
pub struct Coordinator<S: DataSource> {
    name: String,
    update_interval: Duration,
    source: S,
    data_tx: watch::Sender<Snapshot<S::Data>>,
    status: RwLock<RefreshStatus>,
    refresh_lock: Mutex<()>,
}

impl<S: DataSource> Coordinator<S> {
    pub fn new(name: impl Into<String>, update_interval: Duration, source: S) -> Self {
        let (data_tx, _) = watch::channel(None);
        Self {
            name: name.into(),
            update_interval,
            source,
            data_tx,
            status: RwLock::new(RefreshStatus::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Set up the source, then refresh once
    pub async fn first_refresh(&self) -> Result<Arc<S::Data>, UpdateError> {
        info!("Setting up coordinator {}...", self.name);
        if let Err(e) = self.source.setup().await {
            self.record_failure(&e).await;
            return Err(e);
        }
        self.refresh().await
    }

    /// Fetch a new snapshot and publish it
    ///
    /// Subscribers are notified on every success, even when the snapshot is
    /// equal to the previous one. Concurrent callers are serialized: a refresh
    /// starts only after the previous one has published.
    pub async fn refresh(&self) -> Result<Arc<S::Data>, UpdateError> {
        let _guard = self.refresh_lock.lock().await;
        match self.source.fetch().await {
            Ok(data) => {
                let data = Arc::new(data);
                self.data_tx.send_replace(Some(data.clone()));

                let mut status = self.status.write().await;
                status.last_update_success = true;
                status.last_error = None;
                status.last_updated = Some(Utc::now());
                debug!("Coordinator {} updated", self.name);

                Ok(data)
            }
            Err(e) => {
                self.record_failure(&e).await;
                Err(e)
            }
        }
    }

    /// Latest snapshot, if any refresh succeeded yet
    pub fn data(&self) -> Snapshot<S::Data> {
        self.data_tx.borrow().clone()
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Data>> {
        self.data_tx.subscribe()
    }

    pub async fn last_update_success(&self) -> bool {
        self.status.read().await.last_update_success
    }

    pub async fn status(&self) -> CoordinatorStatus {
        let status = self.status.read().await;
        CoordinatorStatus {
            name: self.name.clone(),
            last_update_success: status.last_update_success,
            last_error: status.last_error.as_ref().map(|e| e.to_string()),
            last_updated: status.last_updated,
        }
    }

    async fn record_failure(&self, err: &UpdateError) {
        let mut status = self.status.write().await;
        status.last_update_success = false;
        status.last_error = Some(err.clone());
    }
}
