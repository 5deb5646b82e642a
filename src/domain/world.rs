// Authoritative simulation state and the fixed per-tick pipeline.

use crate::domain::errors::{ClockFault, ConfigError};
use crate::domain::state::{
    Actor, ActorInput, CollisionEvent, Despawn, DespawnReason, Kinematics, Projectile,
    ProjectileState, SpawnRequest,
};
use crate::domain::systems::collision::{self, Collidable, LauncherExclusions};
use crate::domain::systems::{movement, projectiles, targeting};
use crate::domain::tuning::SimTuning;
use crate::domain::vector::Vector2;
use tracing::{debug, warn};

/// What happened during one `World::step`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub delta: f32,
    pub collisions: Vec<CollisionEvent>,
    pub despawned: Vec<Despawn>,
    /// Projectiles created by fire triggers this tick.
    pub spawned: Vec<u64>,
}

pub struct World {
    tuning: SimTuning,
    tick: u64,
    actors: Vec<Actor>,
    projectiles: Vec<Projectile>,
    next_projectile_id: u64,
}

impl World {
    pub fn new(tuning: SimTuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            tick: 0,
            actors: Vec::new(),
            projectiles: Vec::new(),
            next_projectile_id: 1,
        })
    }

    pub fn tuning(&self) -> &SimTuning {
        &self.tuning
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: u64) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Live projectiles only; terminal ones are removed at the end of each step.
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn projectile(&self, id: u64) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    /// Adds an actor with the configured player tuning. Returns false if the id is taken.
    pub fn spawn_actor(&mut self, id: u64, position: Vector2) -> bool {
        if self.actor(id).is_some() {
            return false;
        }

        let player = self.tuning.player;
        self.actors.push(Actor {
            id,
            body: Kinematics {
                position,
                orientation: 0.0,
                speed: player.speed,
            },
            radius: player.radius,
            last_input: ActorInput::default(),
            fire_cooldown: 0.0,
        });
        true
    }

    pub fn remove_actor(&mut self, id: u64) -> bool {
        let before = self.actors.len();
        self.actors.retain(|a| a.id != id);
        self.actors.len() != before
    }

    /// Replaces the actor's input snapshot; it is reused every tick until replaced.
    pub fn set_input(&mut self, id: u64, input: ActorInput) -> bool {
        match self.actors.iter_mut().find(|a| a.id == id) {
            Some(actor) => {
                actor.last_input = input;
                true
            }
            None => false,
        }
    }

    /// Creates an active projectile right away. It first moves on the next step.
    pub fn spawn_projectile(&mut self, request: SpawnRequest) -> Result<u64, ConfigError> {
        let id = self.next_projectile_id;
        let projectile = Projectile::spawn(id, &request, self.tuning.projectile.radius)?;
        self.projectiles.push(projectile);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        Ok(id)
    }

    /// Runs one tick: movement, targeting, projectile travel, collisions,
    /// range expiry, removal, then fire triggers.
    ///
    /// A zero, negative or non-finite `dt` is refused before anything changes.
    pub fn step(&mut self, dt: f32) -> Result<TickReport, ClockFault> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ClockFault::NonPositiveDelta {
                delta: f64::from(dt),
            });
        }

        self.tick += 1;
        let tick = self.tick;

        // Actor movement.
        let bounds = self.tuning.bounds;
        for a in &mut self.actors {
            a.body = movement::advance(a.body, a.last_input.direction, dt);
            if let Some(bounds) = &bounds {
                a.body.position = bounds.clamp(a.body.position);
            }
        }

        // Targeting uses post-movement positions.
        for a in &mut self.actors {
            if let Some(aim) = a.last_input.aim {
                a.body.orientation =
                    targeting::face_toward(a.body.position, aim, a.body.orientation);
            }
        }

        for p in &mut self.projectiles {
            *p = projectiles::travel(*p, dt);
        }

        // Collisions run before expiry so a last-tick hit still counts as a hit.
        let collidables: Vec<Collidable> = self
            .actors
            .iter()
            .map(|a| Collidable {
                id: a.id,
                position: a.body.position,
                radius: a.radius,
            })
            .collect();
        let exclusions = LauncherExclusions::from_projectiles(&self.projectiles);
        let collisions = collision::resolve(
            &mut self.projectiles,
            &collidables,
            &exclusions,
            self.tuning.collision_shape,
            tick,
        );

        for p in &mut self.projectiles {
            *p = projectiles::expire_if_out_of_range(*p);
        }

        let despawned = self.remove_terminal_projectiles();
        let spawned = self.fire(dt);

        Ok(TickReport {
            tick,
            delta: dt,
            collisions,
            despawned,
            spawned,
        })
    }

    fn remove_terminal_projectiles(&mut self) -> Vec<Despawn> {
        let mut despawned = Vec::new();
        for p in &self.projectiles {
            let reason = match p.state() {
                ProjectileState::Active => continue,
                ProjectileState::Expired => {
                    debug!(
                        projectile_id = p.id,
                        distance = p.distance_traveled,
                        max_range = p.max_range,
                        "projectile out of range"
                    );
                    DespawnReason::Expired
                }
                ProjectileState::Destroyed { by } => DespawnReason::Collision { other_id: by },
            };
            despawned.push(Despawn {
                projectile_id: p.id,
                reason,
            });
        }

        self.projectiles.retain(|p| p.is_alive());
        despawned
    }

    fn fire(&mut self, dt: f32) -> Vec<u64> {
        let cooldown = self.tuning.player.fire_cooldown;
        let shot = self.tuning.projectile;

        let mut requests = Vec::new();
        for a in &mut self.actors {
            a.fire_cooldown = (a.fire_cooldown - dt).max(0.0);
            if a.last_input.fire && a.fire_cooldown <= 0.0 {
                // Inherit the launcher's transform; the launcher exclusion prevents self-hits.
                requests.push(SpawnRequest {
                    launcher_id: Some(a.id),
                    position: a.body.position,
                    orientation: a.body.orientation,
                    speed: shot.speed,
                    max_range: shot.max_range,
                });
                a.fire_cooldown = cooldown;
            }
        }

        let mut spawned = Vec::with_capacity(requests.len());
        for request in requests {
            match self.spawn_projectile(request) {
                Ok(id) => spawned.push(id),
                Err(e) => warn!(error = %e, launcher_id = request.launcher_id, "fire rejected"),
            }
        }
        spawned
    }
}
