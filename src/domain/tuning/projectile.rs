//! Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileTuning {
    /// Travel speed in pixels per second.
    pub speed: f32,

    /// Distance in pixels before the projectile despawns.
    pub max_range: f32,

    /// World-space collision radius in pixels.
    pub radius: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 400.0,
            max_range: 400.0,
            radius: 4.0,
        }
    }
}
