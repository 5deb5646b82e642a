use crate::use_cases::{GameEvent, ServerState};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::{broadcast, mpsc, watch};

#[derive(Clone)]
pub struct AppState {
    // Inputs and spawn requests flowing into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized world updates, shared across all connections.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Latest serialized world update for lag recovery.
    pub world_latest_tx: watch::Sender<Utf8Bytes>,
    // Serialized hit/despawn notices.
    pub notice_bytes_tx: broadcast::Sender<Utf8Bytes>,
    // Simulation lifecycle (running/halted).
    pub server_state_tx: watch::Sender<ServerState>,
}
