//! Shape factories
//!
//! Each factory returns a counter-clockwise point loop whose centroid is the
//! requested center.

use std::f64::consts::TAU;

use super::vector::{Vector, from_polar};
use crate::consts::CIRCLE_POINTS;

/// Axis-aligned rectangle
pub fn make_rectangle(centroid: Vector, width: f64, height: f64) -> Vec<Vector> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    vec![
        centroid + Vector::new(-hw, -hh),
        centroid + Vector::new(hw, -hh),
        centroid + Vector::new(hw, hh),
        centroid + Vector::new(-hw, hh),
    ]
}

/// Isosceles triangle with its apex pointing along +x
///
/// The base is parallel to the y axis; the centroid sits a third of the
/// height in front of the base.
pub fn make_iso_triangle(centroid: Vector, base: f64, height: f64) -> Vec<Vector> {
    let back = centroid.x - height / 3.0;
    vec![
        Vector::new(back, centroid.y - base / 2.0),
        Vector::new(centroid.x + 2.0 * height / 3.0, centroid.y),
        Vector::new(back, centroid.y + base / 2.0),
    ]
}

/// Circle approximated by `CIRCLE_POINTS` vertices
pub fn make_circle(centroid: Vector, radius: f64) -> Vec<Vector> {
    make_circle_with(centroid, radius, CIRCLE_POINTS)
}

/// Circle approximated by a regular polygon with `points` vertices
pub fn make_circle_with(centroid: Vector, radius: f64, points: usize) -> Vec<Vector> {
    (0..points)
        .map(|i| {
            let angle = TAU * i as f64 / points as f64;
            centroid + from_polar(radius, angle)
        })
        .collect()
}
