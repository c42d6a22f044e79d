//! Polygon geometry
//!
//! Points are stored in world space; translation and rotation mutate them
//! directly. Area, centroid and inertia are recomputed from the points on
//! every query.

use serde::{Deserialize, Serialize};

use super::vector::{self, Vector, cross};
use crate::error::SimError;

/// RGB color, each channel in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Absolute area of a closed point loop (shoelace formula)
pub fn area_of(points: &[Vector]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        sum += cross(points[i], points[(i + 1) % n]);
    }
    (sum / 2.0).abs()
}

/// Centroid of a closed point loop
///
/// Precondition: the loop has non-zero area.
pub fn centroid_of(points: &[Vector]) -> Vector {
    let n = points.len();
    let mut signed = 0.0;
    let mut acc = Vector::ZERO;
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let c = cross(p1, p2);
        signed += c;
        acc += (p1 + p2) * c;
    }
    // Dividing by the signed sum keeps the result independent of winding
    acc / (3.0 * signed)
}

/// A simple polygon with its own velocity, spin and color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Vector>,
    velocity: Vector,
    /// Accumulated rotation (radians, unbounded)
    rotation: f64,
    /// Radians per second
    rotation_speed: f64,
    color: Color,
}

impl Polygon {
    pub fn new(
        points: Vec<Vector>,
        velocity: Vector,
        rotation_speed: f64,
        color: Color,
    ) -> Result<Self, SimError> {
        if points.len() < 3 {
            return Err(SimError::TooFewPoints {
                count: points.len(),
            });
        }
        let area = area_of(&points);
        if !area.is_finite() || area <= f64::EPSILON {
            return Err(SimError::DegeneratePolygon { area });
        }
        Ok(Self {
            points,
            velocity,
            rotation: 0.0,
            rotation_speed,
            color,
        })
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn area(&self) -> f64 {
        area_of(&self.points)
    }

    pub fn centroid(&self) -> Vector {
        centroid_of(&self.points)
    }

    /// Moment of inertia of a uniform lamina about its own centroid
    pub fn rotational_inertia(&self, mass: f64) -> f64 {
        let center = self.centroid();
        let n = self.points.len();
        let mut numer = 0.0;
        let mut denom = 0.0;
        for i in 0..n {
            let p1 = self.points[i] - center;
            let p2 = self.points[(i + 1) % n] - center;
            let c = cross(p1, p2).abs();
            numer += c * (p1.dot(p1) + p1.dot(p2) + p2.dot(p2));
            denom += c;
        }
        mass * numer / (6.0 * denom)
    }

    pub fn translate(&mut self, delta: Vector) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Rotate every point about `pivot` (does not touch the tracked rotation)
    pub fn rotate(&mut self, angle: f64, pivot: Vector) {
        for p in &mut self.points {
            *p = pivot + vector::rotate(*p - pivot, angle);
        }
    }

    /// Advance by one timestep: translate by velocity, then spin about the
    /// centroid
    pub fn step(&mut self, dt: f64) {
        self.translate(self.velocity * dt);
        let angle = self.rotation_speed * dt;
        if angle != 0.0 {
            let pivot = self.centroid();
            self.rotate(angle, pivot);
        }
        self.rotation += angle;
    }

    /// Move so the centroid lands on `target`
    pub fn set_center(&mut self, target: Vector) {
        let delta = target - self.centroid();
        self.translate(delta);
    }

    /// Rotate about the centroid to the absolute angle `angle`
    pub fn set_rotation(&mut self, angle: f64) {
        let pivot = self.centroid();
        self.rotate(angle - self.rotation, pivot);
        self.rotation = angle;
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub fn rotation_speed(&self) -> f64 {
        self.rotation_speed
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f64) {
        self.rotation_speed = rotation_speed;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}
