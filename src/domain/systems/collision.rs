use crate::domain::state::{CollisionEvent, Projectile};
use crate::domain::vector::Vector2;
use std::collections::HashMap;
use tracing::info;

/// Overlap test used between projectiles and collidables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionShape {
    /// Distance between centers <= sum of radii.
    #[default]
    Circle,
    /// Axis-aligned squares with half-extent = radius.
    Box,
}

impl CollisionShape {
    pub fn overlaps(self, a: Vector2, a_radius: f32, b: Vector2, b_radius: f32) -> bool {
        let reach = a_radius + b_radius;
        let d = b - a;
        match self {
            Self::Circle => d.length_squared() <= reach * reach,
            Self::Box => d.x.abs() <= reach && d.y.abs() <= reach,
        }
    }
}

/// Anything a projectile can hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collidable {
    pub id: u64,
    pub position: Vector2,
    pub radius: f32,
}

/// Projectile id -> launcher id pairs that must never collide.
#[derive(Debug, Clone, Default)]
pub struct LauncherExclusions {
    launchers: HashMap<u64, u64>,
}

impl LauncherExclusions {
    pub fn from_projectiles(projectiles: &[Projectile]) -> Self {
        let launchers = projectiles
            .iter()
            .filter_map(|p| p.launcher_id.map(|launcher| (p.id, launcher)))
            .collect();
        Self { launchers }
    }

    pub fn insert(&mut self, projectile_id: u64, launcher_id: u64) {
        self.launchers.insert(projectile_id, launcher_id);
    }

    pub fn excludes(&self, projectile_id: u64, other_id: u64) -> bool {
        self.launchers.get(&projectile_id) == Some(&other_id)
    }
}

/// Finds at most one hit per live projectile and destroys it on the spot.
///
/// Collidables are scanned in slice order and the first overlap wins, so the
/// result is deterministic for a given ordering. Projectiles that are already
/// terminal are skipped, which keeps repeated passes from reporting a second hit.
pub fn resolve(
    projectiles: &mut [Projectile],
    collidables: &[Collidable],
    exclusions: &LauncherExclusions,
    shape: CollisionShape,
    tick: u64,
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    // Naive O(P*C) scan; entity counts are small.
    for p in projectiles.iter_mut() {
        if !p.is_alive() {
            continue;
        }

        let hit = collidables.iter().find(|c| {
            !exclusions.excludes(p.id, c.id)
                && shape.overlaps(p.body.position, p.radius, c.position, c.radius)
        });

        if let Some(other) = hit {
            if p.destroy(other.id) {
                info!(
                    projectile_id = p.id,
                    other_id = other.id,
                    launcher_id = p.launcher_id,
                    tick,
                    "projectile hit"
                );
                events.push(CollisionEvent {
                    projectile_id: p.id,
                    other_id: other.id,
                    tick,
                });
            }
        }
    }

    events
}
