//! Read-only per-frame view of a scene for render collaborators

use serde::{Deserialize, Serialize};

use super::polygon::Color;
use super::scene::{BodyId, Scene};
use super::vector::Vector;

/// What a renderer needs to draw one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub centroid: Vector,
    pub rotation: f64,
    pub points: Vec<Vector>,
    pub color: Color,
    /// Still stored but purged on the next tick
    pub removed: bool,
}

/// All bodies in storage order after a given tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub tick: u64,
    pub bodies: Vec<BodySnapshot>,
}

impl SceneSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<I> Scene<I> {
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            tick: self.ticks(),
            bodies: self
                .bodies()
                .iter()
                .map(|b| BodySnapshot {
                    id: b.id(),
                    centroid: b.centroid(),
                    rotation: b.rotation(),
                    points: b.shape(),
                    color: b.color(),
                    removed: b.is_removed(),
                })
                .collect(),
        }
    }
}
