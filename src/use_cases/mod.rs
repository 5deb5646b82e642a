// Use cases layer: application workflows around the simulation.

pub mod game;
pub mod types;

pub use game::{WorldChannels, world_task};
pub use types::{GameEvent, ServerState, SimNotice, WorldUpdate};
