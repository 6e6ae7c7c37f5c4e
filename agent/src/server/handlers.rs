//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use entity_models::models::{
    BinarySensorState, CommandResponse, ErrorResponse, FanSpeedRequest, HealthResponse,
    LitterBoxDeviceResponse, LitterBoxStatusResponse, OperationRequest, VacuumCommandRequest,
    VersionResponse,
};
use tracing::warn;

use crate::entities::binary_sensor::{device_info, LitterBoxBinarySensor};
use crate::errors::{ApiError, UpdateError};
use crate::models::device::Device;
use crate::server::state::ServerState;
use crate::utils::version_info;
use crate::vacuum::{FanSpeed, VacuumEntity};

/// Handler failures, rendered as `{"error": ...}`
#[derive(Debug)]
pub enum HandlerError {
    BadRequest(String),
    NotFound(String),
    NotReady(String),
    Unauthorized(String),
    Upstream(String),
}

impl From<ApiError> for HandlerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication(_) => HandlerError::Unauthorized(err.to_string()),
            other => HandlerError::Upstream(other.to_string()),
        }
    }
}

impl From<UpdateError> for HandlerError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::AuthFailed(_) => HandlerError::Unauthorized(err.to_string()),
            UpdateError::UpdateFailed(_) => HandlerError::Upstream(err.to_string()),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            HandlerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HandlerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HandlerError::NotReady(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            HandlerError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            HandlerError::Upstream(msg) => {
                warn!("Upstream call failed: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "cloudlink".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    let version = version_info();
    Json(VersionResponse {
        version: version.version,
        git_hash: version.git_hash,
        build_time: version.build_time,
        profile: version.profile,
    })
}

// ================================= CATGENIE ===================================== //

async fn selected_device(state: &ServerState) -> Result<Device, HandlerError> {
    state
        .catgenie
        .source()
        .device()
        .await
        .ok_or_else(|| HandlerError::NotReady("Litter box not set up yet".to_string()))
}

/// Litter box identity handler
pub async fn catgenie_device_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let device = selected_device(&state).await?;

    Ok(Json(LitterBoxDeviceResponse {
        device_info: device_info(&device),
        mac_address: device.mac_address,
        manufacturer_id: device.manufacturer_id,
        reported_status: device.reported_status,
    }))
}

/// Litter box status handler
pub async fn catgenie_status_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let status = state
        .catgenie
        .data()
        .ok_or_else(|| HandlerError::NotReady("No litter box status yet".to_string()))?;

    Ok(Json(LitterBoxStatusResponse {
        state: status.state,
        progress: status.progress,
        error: status.error.clone(),
        rtc: status.rtc.clone(),
        sens: status.sens.clone(),
        mode: status.mode,
        manual: status.manual,
        step_num: status.step_num,
        relay_mode: status.relay_mode,
        running: status.is_running(),
        problem: status.has_problem(),
        coordinator: state.catgenie.status().await,
    }))
}

/// Litter box binary sensors handler
pub async fn binary_sensors_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let device = selected_device(&state).await?;
    let status = state.catgenie.data();

    let sensors: Vec<BinarySensorState> = LitterBoxBinarySensor::for_device(&device)
        .iter()
        .map(|sensor| sensor.state(&device, status.as_deref()))
        .collect();

    Ok(Json(sensors))
}

/// Force a litter box refresh
pub async fn catgenie_refresh_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    state.catgenie.refresh().await?;
    Ok(Json(CommandResponse {
        success: true,
        message: None,
    }))
}

/// Send an operation to the litter box
pub async fn catgenie_operation_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<OperationRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let device = selected_device(&state).await?;
    state
        .catgenie
        .source()
        .api()
        .send_operation(&device.manufacturer_id, request.state)
        .await?;

    Ok(Json(CommandResponse {
        success: true,
        message: Some(format!("Operation {} sent", request.state)),
    }))
}

// ================================== VACUUM ====================================== //

fn configured_vacuum(state: &ServerState) -> Result<&Arc<VacuumEntity>, HandlerError> {
    state
        .vacuum
        .as_ref()
        .ok_or_else(|| HandlerError::NotFound("No vacuum configured".to_string()))
}

fn command_sent(command: &str) -> Json<CommandResponse> {
    Json(CommandResponse {
        success: true,
        message: Some(format!("{} sent", command)),
    })
}

/// Vacuum state handler
pub async fn vacuum_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let vacuum = configured_vacuum(&state)?;
    if vacuum.coordinator().data().is_none() {
        return Err(HandlerError::NotReady("No vacuum status yet".to_string()));
    }
    Ok(Json(vacuum.to_response().await))
}

pub async fn vacuum_start_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    configured_vacuum(&state)?.start().await?;
    Ok(command_sent("start"))
}

pub async fn vacuum_pause_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    configured_vacuum(&state)?.pause().await?;
    Ok(command_sent("pause"))
}

pub async fn vacuum_return_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, HandlerError> {
    configured_vacuum(&state)?.return_to_base().await?;
    Ok(command_sent("return_to_base"))
}

pub async fn vacuum_fan_speed_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<FanSpeedRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let vacuum = configured_vacuum(&state)?;
    let fan_speed: FanSpeed = request.fan_speed.parse().map_err(HandlerError::BadRequest)?;
    vacuum.set_fan_speed(fan_speed).await?;
    Ok(command_sent("fan_speed"))
}

pub async fn vacuum_command_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<VacuumCommandRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    configured_vacuum(&state)?
        .send_command(&request.command, request.params)
        .await?;
    Ok(command_sent(&request.command))
}
