use crate::domain::state::Projectile;
use crate::domain::vector::Vector2;

/// Moves a live projectile straight along its spawn orientation and adds the
/// distance to its odometer. Projectiles never turn.
pub fn travel(mut p: Projectile, dt: f32) -> Projectile {
    if !p.is_alive() {
        return p;
    }

    let move_amount = p.body.speed * dt;
    p.body.position = p.body.position + Vector2::from_angle(p.body.orientation) * move_amount;
    p.distance_traveled += move_amount;
    p
}

/// Expires a live projectile once it has gone strictly past its range.
/// Exactly `max_range` still counts as in range.
pub fn expire_if_out_of_range(mut p: Projectile) -> Projectile {
    if p.is_alive() && p.distance_traveled > p.max_range {
        p.expire();
    }
    p
}

/// One full lifecycle step without a collision pass: travel, then range check.
pub fn step_projectile(p: Projectile, dt: f32) -> Projectile {
    expire_if_out_of_range(travel(p, dt))
}
