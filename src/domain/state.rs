// Domain-level simulation entities and input/snapshot types.

use crate::domain::errors::{ConfigError, require_non_negative, require_positive};
use crate::domain::vector::Vector2;

/// Position, facing and speed shared by every moving thing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub position: Vector2,
    /// Radians, 0 = +X, growing clockwise on a +Y-down screen.
    pub orientation: f32,
    /// Pixels per second, never negative.
    pub speed: f32,
}

/// Per-tick intent for one actor, supplied by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActorInput {
    /// Desired movement direction; any length, zero means stand still.
    pub direction: Vector2,
    /// World-space point to face, if any.
    pub aim: Option<Vector2>,
    pub fire: bool,
}

pub struct Actor {
    pub id: u64,
    pub body: Kinematics,
    /// Collision extent in pixels.
    pub radius: f32,

    // Control-only state (not exposed to renderers)
    pub last_input: ActorInput,
    pub fire_cooldown: f32, // seconds until next allowed shot
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileState {
    Active,
    /// Travelled past its maximum range.
    Expired,
    /// Hit the collidable with id `by`.
    Destroyed { by: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub id: u64,
    /// Actor that fired it; never collides with this id.
    pub launcher_id: Option<u64>,
    pub body: Kinematics,
    pub radius: f32,
    pub distance_traveled: f32,
    pub max_range: f32,
    state: ProjectileState,
}

impl Projectile {
    /// Builds an active projectile, rejecting non-positive speed or range.
    pub fn spawn(id: u64, request: &SpawnRequest, radius: f32) -> Result<Self, ConfigError> {
        request.validate()?;
        let radius = require_non_negative("projectile_radius", radius)?;

        Ok(Self {
            id,
            launcher_id: request.launcher_id,
            body: Kinematics {
                position: request.position,
                orientation: request.orientation,
                speed: request.speed,
            },
            radius,
            distance_traveled: 0.0,
            max_range: request.max_range,
            state: ProjectileState::Active,
        })
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == ProjectileState::Active
    }

    /// Active -> Expired. Terminal states are left alone.
    pub fn expire(&mut self) {
        if self.is_alive() {
            self.state = ProjectileState::Expired;
        }
    }

    /// Active -> Destroyed. Returns false if the projectile was already terminal.
    pub fn destroy(&mut self, by: u64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.state = ProjectileState::Destroyed { by };
        true
    }
}

/// Request to create a projectile, from a fire trigger or the spawn collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub launcher_id: Option<u64>,
    pub position: Vector2,
    pub orientation: f32,
    pub speed: f32,
    pub max_range: f32,
}

impl SpawnRequest {
    /// Speed and range must be finite and > 0; the spawn point must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("projectile_speed", self.speed)?;
        require_positive("projectile_max_range", self.max_range)?;
        if !self.position.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "spawn_position",
            });
        }
        if !self.orientation.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "spawn_orientation",
            });
        }
        Ok(())
    }
}

/// A projectile overlapped a collidable during `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub projectile_id: u64,
    pub other_id: u64,
    pub tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespawnReason {
    Expired,
    Collision { other_id: u64 },
}

/// Cleanup notice for the scene collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Despawn {
    pub projectile_id: u64,
    pub reason: DespawnReason,
}

#[derive(Debug, Clone)]
pub struct ActorSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
}

#[derive(Debug, Clone)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub launcher_id: Option<u64>,
    pub x: f32,
    pub y: f32,
    pub rot: f32,
}

impl From<&Actor> for ActorSnapshot {
    fn from(a: &Actor) -> Self {
        Self {
            id: a.id,
            x: a.body.position.x,
            y: a.body.position.y,
            rot: a.body.orientation,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            launcher_id: p.launcher_id,
            x: p.body.position.x,
            y: p.body.position.y,
            rot: p.body.orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SpawnRequest {
        SpawnRequest {
            launcher_id: Some(7),
            position: Vector2::new(1.0, 2.0),
            orientation: 0.5,
            speed: 400.0,
            max_range: 400.0,
        }
    }

    #[test]
    fn when_request_is_valid_then_projectile_spawns_active() {
        let p = Projectile::spawn(1, &request(), 5.0).expect("valid spawn");
        assert!(p.is_alive());
        assert_eq!(p.distance_traveled, 0.0);
        assert_eq!(p.launcher_id, Some(7));
        assert_eq!(p.body.position, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn when_speed_is_zero_then_spawn_is_rejected() {
        let mut req = request();
        req.speed = 0.0;
        assert!(matches!(
            Projectile::spawn(1, &req, 5.0),
            Err(ConfigError::NonPositive {
                field: "projectile_speed",
                ..
            })
        ));
    }

    #[test]
    fn when_range_is_nan_then_spawn_is_rejected() {
        let mut req = request();
        req.max_range = f32::NAN;
        assert!(Projectile::spawn(1, &req, 5.0).is_err());
    }

    #[test]
    fn when_projectile_is_terminal_then_it_never_changes_state_again() {
        let mut p = Projectile::spawn(1, &request(), 5.0).expect("valid spawn");
        assert!(p.destroy(9));
        assert!(!p.destroy(10));
        p.expire();
        assert_eq!(p.state(), ProjectileState::Destroyed { by: 9 });

        let mut q = Projectile::spawn(2, &request(), 5.0).expect("valid spawn");
        q.expire();
        assert!(!q.destroy(3));
        assert_eq!(q.state(), ProjectileState::Expired);
    }
}
