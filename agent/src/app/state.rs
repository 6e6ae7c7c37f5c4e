//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::{CatGenieOptions, SwitchBotOptions};
use crate::authn::token_mngr::TokenManager;
use crate::coordinator::catgenie::CatGenieSource;
use crate::coordinator::switchbot::VacuumSource;
use crate::coordinator::Coordinator;
use crate::errors::AgentError;
use crate::http::client::HttpClient;
use crate::http::devices::DeviceApi;
use crate::http::switchbot::SwitchBotClient;
use crate::vacuum::VacuumEntity;

pub const CATGENIE_COORDINATOR: &str = "catgenie";
pub const SWITCHBOT_COORDINATOR: &str = "switchbot";

/// Main application state
pub struct AppState {
    /// CatGenie litter box coordinator
    pub catgenie: Arc<Coordinator<CatGenieSource>>,

    /// SwitchBot vacuum entity
    pub vacuum: Option<Arc<VacuumEntity>>,
}

impl AppState {
    /// Build clients and coordinators. Nothing is fetched yet.
    pub fn init(
        catgenie: CatGenieOptions,
        switchbot: Option<SwitchBotOptions>,
    ) -> Result<Self, AgentError> {
        info!("Initializing application state...");

        let catgenie = Arc::new(init_catgenie(catgenie)?);
        let vacuum = match switchbot {
            Some(switchbot) => Some(Arc::new(VacuumEntity::new(Arc::new(init_vacuum(
                switchbot,
            )?)))),
            None => None,
        };

        Ok(Self { catgenie, vacuum })
    }
}

fn init_catgenie(options: CatGenieOptions) -> Result<Coordinator<CatGenieSource>, AgentError> {
    let http_client = Arc::new(HttpClient::catgenie(
        &options.base_url,
        options.request_timeout,
    )?);
    let token_mngr = Arc::new(TokenManager::new(
        http_client.clone(),
        options.refresh_token,
    ));
    let api = DeviceApi::new(http_client, token_mngr);

    Ok(Coordinator::new(
        CATGENIE_COORDINATOR,
        options.update_interval,
        CatGenieSource::new(api),
    ))
}

fn init_vacuum(options: SwitchBotOptions) -> Result<Coordinator<VacuumSource>, AgentError> {
    let client = SwitchBotClient::new(
        &options.base_url,
        options.request_timeout,
        options.token,
        options.secret,
    )?;

    Ok(Coordinator::new(
        SWITCHBOT_COORDINATOR,
        options.update_interval,
        VacuumSource::new(client, options.device_id),
    ))
}
