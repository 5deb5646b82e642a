use crate::domain::{SpawnRequest, Vector2};
use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::state::AppState;
use crate::use_cases::GameEvent;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Spawn request from the scene collaborator.
#[derive(Debug, serde::Deserialize)]
pub struct SpawnProjectileRequest {
    // Actor the projectile must never hit, if any.
    #[serde(default)]
    launcher_id: Option<u64>,
    x: f32,
    y: f32,
    // Radians; 0 points along +X.
    #[serde(default)]
    orientation: f32,
    speed: f32,
    max_range: f32,
}

impl From<SpawnProjectileRequest> for SpawnRequest {
    fn from(req: SpawnProjectileRequest) -> Self {
        Self {
            launcher_id: req.launcher_id,
            position: Vector2::new(req.x, req.y),
            orientation: req.orientation,
            speed: req.speed,
            max_range: req.max_range,
        }
    }
}

pub async fn spawn_projectile_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SpawnProjectileRequest>,
) -> Response {
    let request = SpawnRequest::from(payload);

    // Reject bad parameters here so the caller gets the error, not the world log.
    if let Err(e) = request.validate() {
        return ErrorResponse::reply(StatusCode::BAD_REQUEST, e.to_string());
    }

    match state.input_tx.try_send(GameEvent::Spawn(request)) {
        Ok(()) => {
            debug!(launcher_id = request.launcher_id, "spawn request queued");
            StatusCode::ACCEPTED.into_response()
        }
        Err(TrySendError::Full(_)) => {
            warn!("input channel full; rejecting spawn request");
            ErrorResponse::reply(StatusCode::SERVICE_UNAVAILABLE, "simulation busy")
        }
        Err(TrySendError::Closed(_)) => {
            ErrorResponse::reply(StatusCode::SERVICE_UNAVAILABLE, "simulation halted")
        }
    }
}
