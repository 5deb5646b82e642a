// Per-tick simulation systems, each a small pure function over domain state.

pub mod bounds;
pub mod collision;
pub mod movement;
pub mod projectiles;
pub mod targeting;
