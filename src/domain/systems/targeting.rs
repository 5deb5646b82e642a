use crate::domain::vector::Vector2;

/// Orientation that points from `from` toward `target`.
///
/// When both points coincide exactly there is no direction to face, so
/// `current` is returned unchanged rather than snapping to 0 rad. Any non-zero
/// offset, however small, is a real aim.
pub fn face_toward(from: Vector2, target: Vector2, current: f32) -> f32 {
    let aim = target - from;
    if aim.is_zero() {
        return current;
    }
    aim.angle()
}
