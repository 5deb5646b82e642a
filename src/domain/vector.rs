// Plain 2D vector math used by every simulation system.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `radians` (0 rad = +X).
    pub fn from_angle(radians: f32) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Overflow-safe length; finite for any finite components below `f32::MAX / sqrt(2)`.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Exactly zero on both axes. Tiny vectors still carry a direction.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Unit-length copy of the vector, or the zero vector when there is no direction.
    ///
    /// Any finite non-zero vector normalizes, however small or large: components
    /// are divided by the larger magnitude first so neither the length nor its
    /// reciprocal can overflow or underflow.
    pub fn normalized(self) -> Self {
        if self.is_zero() || !self.is_finite() {
            return Self::ZERO;
        }
        let largest = self.x.abs().max(self.y.abs());
        let reduced = Self::new(self.x / largest, self.y / largest);
        let len = reduced.length();
        Self::new(reduced.x / len, reduced.y / len)
    }

    /// Angle of the vector in radians, `atan2(y, x)`.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn when_vector_is_zero_then_normalized_is_zero() {
        assert_eq!(Vector2::ZERO.normalized(), Vector2::ZERO);
    }

    #[test]
    fn when_vector_is_diagonal_then_normalized_has_unit_length() {
        let unit = Vector2::new(3.0, 4.0).normalized();
        assert!((unit.length() - 1.0).abs() < 1e-6);
        assert!((unit.x - 0.6).abs() < 1e-6);
        assert!((unit.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn when_vector_is_tiny_or_huge_then_it_still_normalizes() {
        for v in [
            Vector2::new(1e-7, 0.0),
            Vector2::new(0.0, -1e-40),
            Vector2::new(1e20, 0.0),
            Vector2::new(f32::MAX, f32::MAX),
            Vector2::new(-3e-30, 4e-30),
        ] {
            let unit = v.normalized();
            assert!((unit.length() - 1.0).abs() < 1e-6, "{v:?} -> {unit:?}");
            assert_eq!(unit.x.signum(), v.x.signum());
        }
    }

    #[test]
    fn when_vector_is_not_finite_then_normalized_is_zero() {
        assert_eq!(Vector2::new(f32::NAN, 1.0).normalized(), Vector2::ZERO);
        assert_eq!(Vector2::new(f32::INFINITY, 0.0).normalized(), Vector2::ZERO);
    }

    #[test]
    fn when_components_are_huge_then_length_does_not_overflow() {
        let len = Vector2::new(3e20, 4e20).length();
        assert!(len.is_finite());
        assert!((len / 5e20 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn when_vector_points_down_then_angle_is_half_pi() {
        // +Y is down in screen space, so "down" is a quarter turn clockwise.
        assert!((Vector2::new(0.0, 10.0).angle() - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn when_built_from_angle_then_angle_round_trips() {
        let v = Vector2::from_angle(1.2);
        assert!((v.angle() - 1.2).abs() < 1e-6);
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
}
