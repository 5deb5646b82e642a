use crate::domain::{ConfigError, SimTuning};
use std::{env, str::FromStr, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env_or("SIM_HTTP_PORT", 3001)
}

/// Fixed interval between world ticks, from `SIM_TICK_RATE_HZ`.
pub fn tick_interval() -> Duration {
    let hz: u32 = env_or("SIM_TICK_RATE_HZ", 60);
    // 0 Hz would mean an interval of infinity; fall back to the default rate.
    let hz = if hz == 0 { 60 } else { hz };
    Duration::from_secs_f64(1.0 / f64::from(hz))
}

/// Gameplay tuning from the environment, validated before the world is built.
pub fn sim_tuning() -> Result<SimTuning, ConfigError> {
    let mut tuning = SimTuning::default();

    tuning.projectile.speed = env_or("SIM_PROJECTILE_SPEED", tuning.projectile.speed);
    tuning.projectile.max_range = env_or("SIM_PROJECTILE_RANGE", tuning.projectile.max_range);
    tuning.player.speed = env_or("SIM_ACTOR_SPEED", tuning.player.speed);
    tuning.max_clock_delta = env_or("SIM_MAX_CLOCK_DELTA", tuning.max_clock_delta);
    // A misspelled shape is an operator mistake, not a number typo; surface it.
    if let Ok(shape) = env::var("SIM_COLLISION_SHAPE") {
        tuning.collision_shape = shape.parse()?;
    }

    tuning.validate()?;
    Ok(tuning)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;
pub const NOTICE_BROADCAST_CAPACITY: usize = 256;
