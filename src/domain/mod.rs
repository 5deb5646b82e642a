// Domain layer: core simulation types and rules.

pub mod clock;
pub mod errors;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod vector;
pub mod world;

pub use clock::{Clock, FixedClock, MonotonicSource, TickClock, TimeSource};
pub use errors::{ClockFault, ConfigError, SimError};
pub use state::{
    Actor, ActorInput, ActorSnapshot, CollisionEvent, Despawn, DespawnReason, Kinematics,
    Projectile, ProjectileSnapshot, ProjectileState, SpawnRequest,
};
pub use tuning::SimTuning;
pub use vector::Vector2;
pub use world::{TickReport, World};
