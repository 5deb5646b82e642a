//! Gameplay tuning for player-controlled actors.
//!
//! Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTuning {
    /// Movement speed in pixels per second.
    pub speed: f32,

    /// World-space collision radius in pixels.
    pub radius: f32,

    /// Minimum seconds between two shots from the same actor.
    pub fire_cooldown: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 200.0,
            radius: 16.0,
            fire_cooldown: 0.1,
        }
    }
}
