//! Standard force creators
//!
//! Every creator here is bound to the bodies it touches, so removing any of
//! them also drops the binding.

use super::body::Body;
use super::collision::find_body_collision;
use super::scene::{BodyId, BodySet, Scene};
use super::vector::Vector;
use crate::consts::MIN_GRAVITY_DISTANCE;
use crate::error::SimError;

/// Linear drag: `F = -gamma * v`
pub fn create_drag<I: 'static>(scene: &mut Scene<I>, gamma: f64, body: BodyId) -> Result<(), SimError> {
    scene.add_bodies_force_creator(
        move |bodies: &mut BodySet<I>| {
            if let Some(b) = bodies.get_mut(body) {
                let v = b.velocity();
                b.add_force(v * -gamma);
            }
        },
        vec![body],
    )
}

/// Newtonian attraction between two bodies
pub fn create_newtonian_gravity<I: 'static>(
    scene: &mut Scene<I>,
    g: f64,
    a: BodyId,
    b: BodyId,
) -> Result<(), SimError> {
    scene.add_bodies_force_creator(
        move |bodies: &mut BodySet<I>| {
            let Some((ba, bb)) = bodies.pair_mut(a, b) else {
                return;
            };
            let delta = bb.centroid() - ba.centroid();
            let r = delta.length();
            if r < MIN_GRAVITY_DISTANCE {
                return;
            }
            let force = delta * (g * ba.mass() * bb.mass() / (r * r * r));
            ba.add_force(force);
            bb.add_force(-force);
        },
        vec![a, b],
    )
}

/// Hooke spring with zero rest length
pub fn create_spring<I: 'static>(scene: &mut Scene<I>, k: f64, a: BodyId, b: BodyId) -> Result<(), SimError> {
    scene.add_bodies_force_creator(
        move |bodies: &mut BodySet<I>| {
            if let Some((ba, bb)) = bodies.pair_mut(a, b) {
                let force = (bb.centroid() - ba.centroid()) * k;
                ba.add_force(force);
                bb.add_force(-force);
            }
        },
        vec![a, b],
    )
}

/// Run `handler` once each time the two bodies start touching
///
/// The handler receives both bodies and the collision axis (from `a` toward
/// `b`). It fires again only after the bodies have separated.
pub fn create_collision<I, H>(scene: &mut Scene<I>, a: BodyId, b: BodyId, mut handler: H) -> Result<(), SimError>
where
    I: 'static,
    H: FnMut(&mut Body<I>, &mut Body<I>, Vector) + 'static,
{
    let mut touching = false;
    scene.add_bodies_force_creator(
        move |bodies: &mut BodySet<I>| {
            let Some((ba, bb)) = bodies.pair_mut(a, b) else {
                return;
            };
            if ba.is_removed() || bb.is_removed() {
                return;
            }
            let info = find_body_collision(ba, bb);
            if info.collided && !touching {
                handler(ba, bb, info.axis);
            }
            touching = info.collided;
        },
        vec![a, b],
    )
}

/// Impulse response with coefficient of restitution `elasticity`
pub fn create_physics_collision<I: 'static>(
    scene: &mut Scene<I>,
    elasticity: f64,
    a: BodyId,
    b: BodyId,
) -> Result<(), SimError> {
    create_collision(scene, a, b, move |ba, bb, axis| {
        apply_collision_impulse(ba, bb, axis, elasticity);
    })
}

/// Remove both bodies on contact
pub fn create_destructive_collision<I: 'static>(scene: &mut Scene<I>, a: BodyId, b: BodyId) -> Result<(), SimError> {
    create_collision(scene, a, b, |ba, bb, _| {
        ba.remove();
        bb.remove();
    })
}

/// Equal and opposite impulses along `axis` (pointing from `a` to `b`)
///
/// Does nothing unless the bodies are approaching each other along `axis`.
pub fn apply_collision_impulse<I>(a: &mut Body<I>, b: &mut Body<I>, axis: Vector, elasticity: f64) {
    let (ma, mb) = (a.mass(), b.mass());
    let reduced = match (ma.is_infinite(), mb.is_infinite()) {
        (true, true) => return,
        (true, false) => mb,
        (false, true) => ma,
        (false, false) => ma * mb / (ma + mb),
    };
    let closing = b.velocity().dot(axis) - a.velocity().dot(axis);
    if closing >= 0.0 {
        // Already separating along the axis
        return;
    }
    let j = reduced * (1.0 + elasticity) * closing;
    a.add_impulse(axis * j);
    b.add_impulse(axis * -j);
}
