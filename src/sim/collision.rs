//! Collision detection between convex polygons
//!
//! Separating-axis test over the edge normals of both shapes. The reported
//! axis is the one with the smallest overlap, oriented from the first shape
//! toward the second.

use super::body::Body;
use super::vector::{Vector, unit};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Whether the shapes overlap
    pub collided: bool,
    /// Unit axis of minimum overlap (from A toward B), zero on a miss
    pub axis: Vector,
    /// Penetration depth along `axis`
    pub overlap: f64,
}

impl CollisionInfo {
    pub fn miss() -> Self {
        Self {
            collided: false,
            axis: Vector::ZERO,
            overlap: 0.0,
        }
    }
}

/// Project every point onto `axis` and return (min, max)
fn project_onto(points: &[Vector], axis: Vector) -> (f64, f64) {
    points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
        let d = p.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Smallest overlap over `reference`'s edge normals, or None if one separates
fn min_overlap_axis(reference: &[Vector], other: &[Vector]) -> Option<(f64, Vector)> {
    let n = reference.len();
    let mut best: Option<(f64, Vector)> = None;

    for i in 0..n {
        let edge = reference[(i + 1) % n] - reference[i];
        let axis = unit(edge.perp());
        if axis == Vector::ZERO {
            // Zero-length edge (e.g. a swept path of length zero)
            continue;
        }

        let (min_a, max_a) = project_onto(reference, axis);
        let (min_b, max_b) = project_onto(other, axis);
        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap < 0.0 {
            return None;
        }
        if best.is_none_or(|(depth, _)| overlap < depth) {
            best = Some((overlap, axis));
        }
    }

    best
}

/// Check two convex point loops for overlap
pub fn find_collision(shape_a: &[Vector], shape_b: &[Vector]) -> CollisionInfo {
    if shape_a.len() < 3 || shape_b.len() < 3 {
        return CollisionInfo::miss();
    }

    let Some(from_a) = min_overlap_axis(shape_a, shape_b) else {
        return CollisionInfo::miss();
    };
    let Some(from_b) = min_overlap_axis(shape_b, shape_a) else {
        return CollisionInfo::miss();
    };
    let (overlap, mut axis) = if from_b.0 < from_a.0 { from_b } else { from_a };

    // Orient from A toward B; vertex means are enough to pick a side
    let mean = |shape: &[Vector]| shape.iter().copied().sum::<Vector>() / shape.len() as f64;
    if axis.dot(mean(shape_b) - mean(shape_a)) < 0.0 {
        axis = -axis;
    }

    CollisionInfo {
        collided: true,
        axis,
        overlap,
    }
}

/// Check two bodies' current shapes for overlap
pub fn find_body_collision<I>(a: &Body<I>, b: &Body<I>) -> CollisionInfo {
    find_collision(a.polygon().points(), b.polygon().points())
}
