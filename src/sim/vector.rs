//! 2D vector math
//!
//! Vectors are `glam::DVec2` values; glam already covers add, subtract,
//! negate, scale, dot and length. The helpers here fill in the rest.

use glam::DVec2;

/// A 2D vector (f64 components)
pub type Vector = DVec2;

/// Z-component of the 3D cross product
#[inline]
pub fn cross(a: Vector, b: Vector) -> f64 {
    a.perp_dot(b)
}

/// Rotate `v` counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vector, angle: f64) -> Vector {
    let (sin, cos) = angle.sin_cos();
    Vector::new(v.x * cos - v.y * sin, v.y * cos + v.x * sin)
}

/// Unit vector in the direction of `v`; the zero vector maps to zero
#[inline]
pub fn unit(v: Vector) -> Vector {
    v.normalize_or_zero()
}

/// Projection of `v` onto `onto`; projecting onto zero yields zero
pub fn project(v: Vector, onto: Vector) -> Vector {
    let len_sq = onto.length_squared();
    if len_sq == 0.0 {
        return Vector::ZERO;
    }
    onto * (v.dot(onto) / len_sq)
}

/// Build a vector from magnitude and angle (radians from +x)
#[inline]
pub fn from_polar(magnitude: f64, angle: f64) -> Vector {
    Vector::new(magnitude * angle.cos(), magnitude * angle.sin())
}

/// Convert to (magnitude, angle)
#[inline]
pub fn to_polar(v: Vector) -> (f64, f64) {
    (v.length(), v.y.atan2(v.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_cross_sign() {
        let x = Vector::X;
        let y = Vector::Y;
        assert!((cross(x, y) - 1.0).abs() < EPS);
        assert!((cross(y, x) + 1.0).abs() < EPS);
        assert!(cross(x, x * 3.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(Vector::new(2.0, 0.0), FRAC_PI_2);
        assert!(r.x.abs() < EPS);
        assert!((r.y - 2.0).abs() < EPS);

        let back = rotate(r, -FRAC_PI_2);
        assert!((back - Vector::new(2.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_unit_of_zero_is_zero() {
        assert_eq!(unit(Vector::ZERO), Vector::ZERO);
        let u = unit(Vector::new(3.0, 4.0));
        assert!((u.length() - 1.0).abs() < EPS);
        assert!((u.x - 0.6).abs() < EPS);
    }

    #[test]
    fn test_project() {
        let p = project(Vector::new(3.0, 4.0), Vector::new(10.0, 0.0));
        assert!((p - Vector::new(3.0, 0.0)).length() < EPS);
        assert_eq!(project(Vector::new(3.0, 4.0), Vector::ZERO), Vector::ZERO);
    }

    #[test]
    fn test_polar_round_trip() {
        let v = from_polar(5.0, PI / 3.0);
        let (mag, angle) = to_polar(v);
        assert!((mag - 5.0).abs() < EPS);
        assert!((angle - PI / 3.0).abs() < EPS);
    }
}
