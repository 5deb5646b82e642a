// Gameplay tuning and its validation.

pub mod player;
pub mod projectile;

use crate::domain::clock::DEFAULT_MAX_DELTA;
use crate::domain::errors::{ConfigError, require_non_negative, require_positive};
use crate::domain::systems::bounds::WorldBounds;
use crate::domain::systems::collision::CollisionShape;
use player::PlayerTuning;
use projectile::ProjectileTuning;
use std::str::FromStr;

/// Everything a world needs to know before the first tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimTuning {
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    /// Clamp ceiling for a single tick's delta, in seconds.
    pub max_clock_delta: f32,
    pub collision_shape: CollisionShape,
    /// Optional clamp rectangle for actors; `None` leaves positions unbounded.
    pub bounds: Option<WorldBounds>,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            projectile: ProjectileTuning::default(),
            max_clock_delta: DEFAULT_MAX_DELTA,
            collision_shape: CollisionShape::Circle,
            bounds: None,
        }
    }
}

impl SimTuning {
    /// Rejects any non-positive speed, range or delta instead of clamping it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("projectile_speed", self.projectile.speed)?;
        require_positive("projectile_max_range", self.projectile.max_range)?;
        require_non_negative("projectile_radius", self.projectile.radius)?;
        require_positive("actor_speed", self.player.speed)?;
        require_non_negative("actor_radius", self.player.radius)?;
        require_non_negative("fire_cooldown", self.player.fire_cooldown)?;
        require_positive("max_clock_delta", self.max_clock_delta)?;
        if let Some(bounds) = &self.bounds {
            bounds.validate()?;
        }
        Ok(())
    }
}

impl FromStr for CollisionShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "box" => Ok(Self::Box),
            other => Err(ConfigError::UnknownCollisionShape(other.to_string())),
        }
    }
}
