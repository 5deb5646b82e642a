// Wire protocol DTOs and conversions for renderer/input clients.
// Internal spawn-collaborator DTOs live in `net::internal`.

use crate::domain::{
    ActorInput, ActorSnapshot, CollisionEvent, Despawn, DespawnReason, ProjectileSnapshot, Vector2,
};
use crate::use_cases::{ServerState, SimNotice, WorldUpdate};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Actor id bound to this connection.
    Identity { actor_id: String },
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // Hits and despawns, for effects and cleanup.
    Notice(NoticeDto),
    // Loop lifecycle (running, halted on a fatal fault).
    SimState(ServerStateDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Input(ActorInputDto),
}

/// Eight-way directional intent, for keyboard-style clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompassDto {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl CompassDto {
    /// Screen-space direction (+Y is down). Not normalized; movement does that.
    pub fn to_vector(self) -> Vector2 {
        let (x, y) = match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        };
        Vector2::new(x, y)
    }
}

/// Per-tick input payload. `dir` wins over the free vector when both are sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorInputDto {
    #[serde(default)]
    pub dir: Option<CompassDto>,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
    #[serde(default)]
    pub aim_x: Option<f32>,
    #[serde(default)]
    pub aim_y: Option<f32>,
    #[serde(default)]
    pub fire: bool,
}

impl From<ActorInputDto> for ActorInput {
    fn from(input: ActorInputDto) -> Self {
        let direction = match input.dir {
            Some(dir) => dir.to_vector(),
            None => Vector2::new(input.dx, input.dy),
        };
        // Aim needs both coordinates; half a point is treated as no aim.
        let aim = match (input.aim_x, input.aim_y) {
            (Some(x), Some(y)) => Some(Vector2::new(x, y)),
            _ => None,
        };

        Self {
            direction,
            aim,
            fire: input.fire,
        }
    }
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub actors: Vec<ActorStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            actors: update.actors.iter().map(ActorStateDto::from).collect(),
            projectiles: update
                .projectiles
                .iter()
                .map(ProjectileStateDto::from)
                .collect(),
        }
    }
}

/// Flattened actor state for wire transmission in world updates.
#[derive(Debug, Clone, Serialize)]
pub struct ActorStateDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
}

impl From<&ActorSnapshot> for ActorStateDto {
    fn from(actor: &ActorSnapshot) -> Self {
        Self {
            id: actor.id.to_string(),
            x: actor.x,
            y: actor.y,
            rot: actor.rot,
        }
    }
}

/// Flattened projectile state for wire transmission in world updates.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectileStateDto {
    pub id: String,
    pub launcher_id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
}

impl From<&ProjectileSnapshot> for ProjectileStateDto {
    fn from(projectile: &ProjectileSnapshot) -> Self {
        Self {
            id: projectile.id.to_string(),
            launcher_id: projectile.launcher_id.map(|id| id.to_string()),
            x: projectile.x,
            y: projectile.y,
            rot: projectile.rot,
        }
    }
}

/// Discrete simulation events sent alongside world updates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoticeDto {
    Hit {
        projectile_id: String,
        other_id: String,
        tick: u64,
    },
    Expired {
        projectile_id: String,
    },
    Destroyed {
        projectile_id: String,
        other_id: String,
    },
}

impl From<SimNotice> for NoticeDto {
    fn from(notice: SimNotice) -> Self {
        match notice {
            SimNotice::Hit(CollisionEvent {
                projectile_id,
                other_id,
                tick,
            }) => NoticeDto::Hit {
                projectile_id: projectile_id.to_string(),
                other_id: other_id.to_string(),
                tick,
            },
            SimNotice::Despawned(Despawn {
                projectile_id,
                reason: DespawnReason::Expired,
            }) => NoticeDto::Expired {
                projectile_id: projectile_id.to_string(),
            },
            SimNotice::Despawned(Despawn {
                projectile_id,
                reason: DespawnReason::Collision { other_id },
            }) => NoticeDto::Destroyed {
                projectile_id: projectile_id.to_string(),
                other_id: other_id.to_string(),
            },
        }
    }
}

/// Simulation lifecycle state sent to clients.
#[derive(Debug, Clone, Serialize)]
pub enum ServerStateDto {
    Running,
    Halted { reason: String },
}

impl From<ServerState> for ServerStateDto {
    fn from(state: ServerState) -> Self {
        match state {
            ServerState::Running => ServerStateDto::Running,
            ServerState::Halted { reason } => ServerStateDto::Halted { reason },
        }
    }
}
