use crate::domain::state::Kinematics;
use crate::domain::vector::Vector2;

/// Moves `body` along `direction` for `dt` seconds at its own speed.
///
/// Only the direction of `direction` matters: it is normalized first, so the
/// distance covered is always `speed * dt` (or zero for a zero vector).
pub fn advance(body: Kinematics, direction: Vector2, dt: f32) -> Kinematics {
    let displacement = direction.normalized() * (body.speed * dt);
    Kinematics {
        position: body.position + displacement,
        ..body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(speed: f32) -> Kinematics {
        Kinematics {
            position: Vector2::new(10.0, -5.0),
            orientation: 0.3,
            speed,
        }
    }

    #[test]
    fn when_direction_magnitude_varies_then_displacement_is_speed_times_dt() {
        let dt = 1.0 / 60.0;
        for direction in [
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, -250.0),
            Vector2::new(0.001, 0.001),
            Vector2::new(-3.0, 4.0),
            Vector2::new(1e-7, 0.0),
            Vector2::new(0.0, 1e20),
            Vector2::new(-f32::MAX, f32::MAX),
        ] {
            let before = body(200.0);
            let after = advance(before, direction, dt);
            let moved = (after.position - before.position).length();
            assert!(
                (moved - 200.0 * dt).abs() < 1e-4,
                "direction {direction:?} moved {moved}"
            );
        }
    }

    #[test]
    fn when_direction_is_tiny_or_huge_then_a_full_second_covers_speed() {
        for direction in [Vector2::new(1e-7, 0.0), Vector2::new(1e20, 0.0)] {
            let after = advance(body(200.0), direction, 1.0);
            let moved = after.position - body(200.0).position;
            assert!((moved.x - 200.0).abs() < 1e-3, "{direction:?} moved {moved:?}");
            assert_eq!(moved.y, 0.0);
        }
    }

    #[test]
    fn when_direction_is_zero_then_actor_does_not_move() {
        let before = body(200.0);
        let after = advance(before, Vector2::ZERO, 0.5);
        assert_eq!(after, before);
    }

    #[test]
    fn when_moving_diagonally_then_speed_is_not_boosted() {
        // Up + Right pressed together must not be faster than a single key.
        let after = advance(body(200.0), Vector2::new(1.0, -1.0), 1.0);
        let moved = after.position - body(200.0).position;
        assert!((moved.length() - 200.0).abs() < 1e-3);
        assert!((moved.x + moved.y).abs() < 1e-3);
    }

    #[test]
    fn when_advancing_then_orientation_and_speed_are_kept() {
        let after = advance(body(120.0), Vector2::new(0.0, 1.0), 0.1);
        assert_eq!(after.orientation, 0.3);
        assert_eq!(after.speed, 120.0);
    }
}
