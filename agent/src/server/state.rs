//! Server state

use std::sync::Arc;

use crate::app::state::AppState;
use crate::coordinator::catgenie::CatGenieSource;
use crate::coordinator::Coordinator;
use crate::vacuum::VacuumEntity;

/// Server state shared across handlers
pub struct ServerState {
    pub catgenie: Arc<Coordinator<CatGenieSource>>,
    pub vacuum: Option<Arc<VacuumEntity>>,
}

impl ServerState {
    pub fn new(
        catgenie: Arc<Coordinator<CatGenieSource>>,
        vacuum: Option<Arc<VacuumEntity>>,
    ) -> Self {
        Self { catgenie, vacuum }
    }
}

impl From<&AppState> for ServerState {
    fn from(app_state: &AppState) -> Self {
        Self::new(app_state.catgenie.clone(), app_state.vacuum.clone())
    }
}
