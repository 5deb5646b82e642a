// Use-case level inputs/outputs for the simulation loop.

use crate::domain::{
    ActorInput, ActorSnapshot, CollisionEvent, Despawn, ProjectileSnapshot, SpawnRequest,
};

#[derive(Debug, Clone)]
pub enum GameEvent {
    Join { actor_id: u64 },
    Leave { actor_id: u64 },
    Input { actor_id: u64, input: ActorInput },
    /// Projectile requested by the scene collaborator rather than a fire trigger.
    Spawn(SpawnRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerState {
    Running,
    /// The loop stopped on a fatal error and will not tick again.
    Halted { reason: String },
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub actors: Vec<ActorSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
}

/// Discrete events for subscribers that clean up or react to hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimNotice {
    Hit(CollisionEvent),
    Despawned(Despawn),
}
