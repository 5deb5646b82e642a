use super::types::{GameEvent, ServerState, SimNotice, WorldUpdate};
use crate::domain::{
    ActorSnapshot, Clock, ProjectileSnapshot, SimError, SimTuning, Vector2, World,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{error, info, warn};

/// Channel ends the world task reads from and publishes to.
pub struct WorldChannels {
    pub input_rx: mpsc::Receiver<GameEvent>,
    pub world_tx: broadcast::Sender<WorldUpdate>,
    pub notice_tx: broadcast::Sender<SimNotice>,
    pub server_state_tx: watch::Sender<ServerState>,
}

/// Owns the `World` and drives it once per `tick_interval` until shutdown or a clock fault.
pub async fn world_task<C: Clock>(
    mut world: World,
    mut clock: C,
    channels: WorldChannels,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let WorldChannels {
        mut input_rx,
        world_tx,
        notice_tx,
        server_state_tx,
    } = channels;

    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);
    // The first tick completes immediately; consume it so the first delta is a real one.
    interval.tick().await;

    let _ = server_state_tx.send(ServerState::Running);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!(tick = world.tick(), "world task shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(ev) = input_rx.try_recv() {
            apply_event(&mut world, ev);
        }

        // Never integrate a bad delta; stop the world instead.
        let report = match clock.tick().and_then(|dt| world.step(dt)) {
            Ok(report) => report,
            Err(fault) => {
                let err = SimError::from(fault);
                error!(error = %err, tick = world.tick(), "halting simulation");
                let _ = server_state_tx.send(ServerState::Halted {
                    reason: err.to_string(),
                });
                break;
            }
        };

        for hit in report.collisions {
            let _ = notice_tx.send(SimNotice::Hit(hit));
        }
        for despawn in report.despawned {
            let _ = notice_tx.send(SimNotice::Despawned(despawn));
        }

        let _ = world_tx.send(WorldUpdate {
            tick: report.tick,
            actors: world.actors().iter().map(ActorSnapshot::from).collect(),
            projectiles: world
                .projectiles()
                .iter()
                .map(ProjectileSnapshot::from)
                .collect(),
        });
    }
}

fn apply_event(world: &mut World, ev: GameEvent) {
    match ev {
        GameEvent::Join { actor_id } => {
            let position = spawn_point(world.tuning(), spawn_seed(actor_id));
            if world.spawn_actor(actor_id, position) {
                info!(actor_id, x = position.x, y = position.y, "actor joined");
            } else {
                warn!(actor_id, "duplicate join ignored");
            }
        }
        GameEvent::Leave { actor_id } => {
            if world.remove_actor(actor_id) {
                info!(actor_id, "actor left");
            }
        }
        GameEvent::Input { actor_id, input } => {
            world.set_input(actor_id, input);
        }
        GameEvent::Spawn(request) => match world.spawn_projectile(request) {
            Ok(projectile_id) => {
                info!(projectile_id, launcher_id = request.launcher_id, "projectile spawned");
            }
            Err(e) => warn!(error = %e, "spawn request rejected"),
        },
    }
}

// Joining actors scatter over the arena (or a default area when unbounded).
fn spawn_point(tuning: &SimTuning, seed: u64) -> Vector2 {
    // Two successive mixes give independent x and y fractions.
    let a = mix64(seed);
    let b = mix64(a);
    let (fx, fy) = (unit_fraction(a), unit_fraction(b));

    match tuning.bounds {
        Some(bounds) => Vector2::new(
            bounds.min_x + fx * (bounds.max_x - bounds.min_x),
            bounds.min_y + fy * (bounds.max_y - bounds.min_y),
        ),
        None => Vector2::new(fx * 800.0 - 400.0, fy * 460.0 - 230.0),
    }
}

fn spawn_seed(actor_id: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    now ^ actor_id.rotate_left(32)
}

// splitmix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// Top 24 bits as a fraction in [0, 1).
fn unit_fraction(bits: u64) -> f32 {
    (bits >> 40) as f32 / (1u64 << 24) as f32
}
