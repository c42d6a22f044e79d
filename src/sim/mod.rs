//! Deterministic simulation module
//!
//! The rigid-body core. This module must stay pure and deterministic:
//! - `dt` comes from the caller; no wall-clock time
//! - No randomness
//! - Stable iteration order (storage order for bodies, registration order
//!   for force creators)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod forces;
pub mod polygon;
pub mod scene;
pub mod shapes;
pub mod snapshot;
pub mod vector;

pub use body::Body;
pub use collision::{CollisionInfo, find_body_collision, find_collision};
pub use forces::{
    apply_collision_impulse, create_collision, create_destructive_collision, create_drag,
    create_newtonian_gravity, create_physics_collision, create_spring,
};
pub use polygon::{Color, Polygon};
pub use scene::{BodyId, BodySet, ForceCreator, Scene};
pub use shapes::{make_circle, make_circle_with, make_iso_triangle, make_rectangle};
pub use snapshot::{BodySnapshot, SceneSnapshot};
pub use vector::Vector;
