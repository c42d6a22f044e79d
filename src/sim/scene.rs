//! Scene: body storage, force-creator registry and the simulation tick
//!
//! Each tick runs every force creator (registration order), then walks the
//! bodies in storage order: removed bodies are purged together with every
//! force binding that targets them, live bodies are integrated.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::error::SimError;

/// Stable handle to a body inside a scene (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Id carried by bodies that have not been added to a scene yet
    pub const UNASSIGNED: BodyId = BodyId(0);
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered body storage handed to force creators
#[derive(Debug)]
pub struct BodySet<I = ()> {
    bodies: Vec<Body<I>>,
}

impl<I> BodySet<I> {
    fn new() -> Self {
        Self { bodies: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.iter().position(|b| b.id() == id)
    }

    pub fn get(&self, id: BodyId) -> Option<&Body<I>> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body<I>> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    /// Borrow two distinct bodies mutably (None if either is missing or a == b)
    pub fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut Body<I>, &mut Body<I>)> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.bodies.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.bodies.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body<I>> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body<I>> {
        self.bodies.iter_mut()
    }
}

/// Per-tick behavior acting on bodies (thrust, drag, collision response, ...)
///
/// State captured by the creator lives exactly as long as its binding.
pub trait ForceCreator<I> {
    fn apply(&mut self, bodies: &mut BodySet<I>);
}

impl<I, F> ForceCreator<I> for F
where
    F: FnMut(&mut BodySet<I>),
{
    fn apply(&mut self, bodies: &mut BodySet<I>) {
        self(bodies)
    }
}

/// A registered force creator and the bodies it depends on
struct ForceInstance<I> {
    creator: Box<dyn ForceCreator<I>>,
    /// Used only to purge the binding when one of these bodies goes away
    bodies: Vec<BodyId>,
}

/// Sole owner of every body and force binding in a simulation
pub struct Scene<I = ()> {
    bodies: BodySet<I>,
    forces: Vec<ForceInstance<I>>,
    next_id: u32,
    ticks: u64,
}

impl<I> Default for Scene<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Scene<I> {
    pub fn new() -> Self {
        Self {
            bodies: BodySet::new(),
            forces: Vec::new(),
            next_id: 1,
            ticks: 0,
        }
    }

    /// Take ownership of a body and return its handle
    pub fn add_body(&mut self, mut body: Body<I>) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.set_id(id);
        self.bodies.bodies.push(body);
        log::trace!("Added body {id} ({} total)", self.bodies.len());
        id
    }

    /// Number of stored bodies, including removed ones awaiting purge
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, id: BodyId) -> Option<&Body<I>> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body<I>> {
        self.bodies.get_mut(id)
    }

    /// Body at a storage index
    pub fn body_at(&self, index: usize) -> Option<&Body<I>> {
        self.bodies.bodies.get(index)
    }

    pub fn bodies(&self) -> &BodySet<I> {
        &self.bodies
    }

    /// Tombstone a body; it is purged on the next tick
    pub fn remove_body(&mut self, id: BodyId) -> Result<(), SimError> {
        let body = self
            .bodies
            .get_mut(id)
            .ok_or(SimError::UnknownBody { id })?;
        body.remove();
        Ok(())
    }

    /// Register a creator that is not tied to any body
    pub fn add_force_creator<F>(&mut self, creator: F)
    where
        F: ForceCreator<I> + 'static,
    {
        self.forces.push(ForceInstance {
            creator: Box::new(creator),
            bodies: Vec::new(),
        });
    }

    /// Register a creator that is purged when any of `bodies` is removed
    pub fn add_bodies_force_creator<F>(&mut self, creator: F, bodies: Vec<BodyId>) -> Result<(), SimError>
    where
        F: ForceCreator<I> + 'static,
    {
        if let Some(&id) = bodies.iter().find(|&&id| self.bodies.index_of(id).is_none()) {
            return Err(SimError::UnknownBody { id });
        }
        self.forces.push(ForceInstance {
            creator: Box::new(creator),
            bodies,
        });
        Ok(())
    }

    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the whole simulation by `dt`
    pub fn tick(&mut self, dt: f64) {
        for force in &mut self.forces {
            force.creator.apply(&mut self.bodies);
        }

        let mut i = 0;
        while i < self.bodies.len() {
            if !self.bodies.bodies[i].is_removed() {
                self.bodies.bodies[i].tick(dt);
                i += 1;
                continue;
            }

            // The slot at `i` now holds the next body, so don't advance
            let removed = self.bodies.bodies.remove(i);
            let id = removed.id();
            let before = self.forces.len();
            self.forces.retain(|force| !force.bodies.contains(&id));
            log::debug!(
                "Purged body {id} and {} force binding(s)",
                before - self.forces.len()
            );
            drop(removed);
        }

        self.ticks += 1;
        log::trace!(
            "Tick {}: {} bodies, {} forces",
            self.ticks,
            self.bodies.len(),
            self.forces.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::polygon::Color;
    use crate::sim::shapes::make_rectangle;
    use crate::sim::vector::Vector;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const GRAY: Color = Color::new(0.5, 0.5, 0.5);

    fn moving_square(scene: &mut Scene, x: f64, velocity: Vector) -> BodyId {
        let mut body = Body::new(make_rectangle(Vector::new(x, 0.0), 1.0, 1.0), 1.0, GRAY).unwrap();
        body.set_velocity(velocity);
        scene.add_body(body)
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let mut scene: Scene = Scene::new();
        let a = moving_square(&mut scene, 0.0, Vector::ZERO);
        let b = moving_square(&mut scene, 5.0, Vector::ZERO);
        assert_ne!(a, b);
        assert_eq!(scene.body(a).unwrap().id(), a);
        assert_eq!(scene.body_at(1).unwrap().id(), b);

        scene.remove_body(a).unwrap();
        scene.tick(0.1);
        let c = moving_square(&mut scene, 9.0, Vector::ZERO);
        assert_ne!(c, a);
        assert!(scene.body(a).is_none());
    }

    #[test]
    fn test_remove_unknown_body_is_an_error() {
        let mut scene: Scene = Scene::new();
        assert_eq!(
            scene.remove_body(BodyId(42)),
            Err(SimError::UnknownBody { id: BodyId(42) })
        );
    }

    #[test]
    fn test_removed_body_does_not_skip_successors() {
        let mut scene: Scene = Scene::new();
        let v = Vector::new(1.0, 0.0);
        let a = moving_square(&mut scene, 0.0, v);
        let b = moving_square(&mut scene, 10.0, v);
        let c = moving_square(&mut scene, 20.0, v);
        scene.remove_body(a).unwrap();

        scene.tick(1.0);

        assert_eq!(scene.body_count(), 2);
        // Each survivor moved exactly one step
        assert!((scene.body(b).unwrap().centroid().x - 11.0).abs() < 1e-9);
        assert!((scene.body(c).unwrap().centroid().x - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjacent_removals() {
        let mut scene: Scene = Scene::new();
        let v = Vector::new(0.0, 2.0);
        let a = moving_square(&mut scene, 0.0, v);
        let b = moving_square(&mut scene, 10.0, v);
        let c = moving_square(&mut scene, 20.0, v);
        let d = moving_square(&mut scene, 30.0, v);
        scene.remove_body(b).unwrap();
        scene.remove_body(c).unwrap();

        scene.tick(0.5);

        assert_eq!(scene.body_count(), 2);
        assert!((scene.body(a).unwrap().centroid().y - 1.0).abs() < 1e-9);
        assert!((scene.body(d).unwrap().centroid().y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_removal_purges_only_dependent_bindings() {
        let mut scene: Scene = Scene::new();
        let a = moving_square(&mut scene, 0.0, Vector::ZERO);
        let b = moving_square(&mut scene, 10.0, Vector::ZERO);

        let on_a = Rc::new(Cell::new(0));
        let on_b = Rc::new(Cell::new(0));
        let counter = on_a.clone();
        scene
            .add_bodies_force_creator(move |_: &mut BodySet| counter.set(counter.get() + 1), vec![a])
            .unwrap();
        let counter = on_b.clone();
        scene
            .add_bodies_force_creator(move |_: &mut BodySet| counter.set(counter.get() + 1), vec![b])
            .unwrap();

        scene.remove_body(a).unwrap();
        scene.tick(0.1);
        // Creators run before the purge
        assert_eq!((on_a.get(), on_b.get()), (1, 1));
        assert_eq!(scene.force_count(), 1);

        scene.tick(0.1);
        assert_eq!((on_a.get(), on_b.get()), (1, 2));
    }

    #[test]
    fn test_unknown_body_binding_rejected() {
        let mut scene: Scene = Scene::new();
        let a = moving_square(&mut scene, 0.0, Vector::ZERO);
        let result = scene.add_bodies_force_creator(|_: &mut BodySet| {}, vec![a, BodyId(99)]);
        assert_eq!(result, Err(SimError::UnknownBody { id: BodyId(99) }));
        assert_eq!(scene.force_count(), 0);
    }

    #[test]
    fn test_creators_run_in_order_before_integration() {
        let mut scene: Scene = Scene::new();
        let a = moving_square(&mut scene, 0.0, Vector::new(1.0, 0.0));
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in 0..3 {
            let log = log.clone();
            scene.add_force_creator(move |bodies: &mut BodySet| {
                let x = bodies.get(a).unwrap().centroid().x;
                log.borrow_mut().push((tag, x));
            });
        }

        scene.tick(1.0);
        scene.tick(1.0);
        let log = log.borrow();
        let tags: Vec<_> = log.iter().map(|(t, _)| *t).collect();
        assert_eq!(tags, vec![0, 1, 2, 0, 1, 2]);
        // First tick saw the pre-integration position for all three creators
        assert!(log[..3].iter().all(|(_, x)| x.abs() < 1e-9));
        assert!(log[3..].iter().all(|(_, x)| (x - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_creator_forces_apply_same_tick() {
        let mut scene: Scene = Scene::new();
        let a = moving_square(&mut scene, 0.0, Vector::ZERO);
        scene
            .add_bodies_force_creator(
                move |bodies: &mut BodySet| {
                    bodies.get_mut(a).unwrap().add_force(Vector::new(2.0, 0.0));
                },
                vec![a],
            )
            .unwrap();
        scene.tick(1.0);
        assert!((scene.body(a).unwrap().velocity().x - 2.0).abs() < 1e-12);
        assert_eq!(scene.ticks(), 1);
    }

    struct DropCounter(Rc<Cell<u32>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_purge_drops_aux_and_info() {
        let aux_drops = Rc::new(Cell::new(0));
        let info_drops = Rc::new(Cell::new(0));

        let mut scene: Scene<DropCounter> = Scene::new();
        let body = Body::with_info(
            make_rectangle(Vector::ZERO, 1.0, 1.0),
            1.0,
            GRAY,
            DropCounter(info_drops.clone()),
        )
        .unwrap();
        let id = scene.add_body(body);

        let aux = DropCounter(aux_drops.clone());
        scene
            .add_bodies_force_creator(
                move |_: &mut BodySet<DropCounter>| {
                    let _keep = &aux;
                },
                vec![id],
            )
            .unwrap();

        scene.tick(0.1);
        assert_eq!((aux_drops.get(), info_drops.get()), (0, 0));

        scene.remove_body(id).unwrap();
        scene.tick(0.1);
        assert_eq!((aux_drops.get(), info_drops.get()), (1, 1));
        assert_eq!(scene.body_count(), 0);
        assert_eq!(scene.force_count(), 0);
    }

    #[test]
    fn test_dropping_scene_drops_everything() {
        let info_drops = Rc::new(Cell::new(0));
        let mut scene: Scene<DropCounter> = Scene::new();
        for i in 0..3 {
            let body = Body::with_info(
                make_rectangle(Vector::new(i as f64 * 5.0, 0.0), 1.0, 1.0),
                1.0,
                GRAY,
                DropCounter(info_drops.clone()),
            )
            .unwrap();
            scene.add_body(body);
        }
        drop(scene);
        assert_eq!(info_drops.get(), 3);
    }

    #[test]
    fn test_pair_mut() {
        let mut scene: Scene = Scene::new();
        let a = moving_square(&mut scene, 0.0, Vector::ZERO);
        let b = moving_square(&mut scene, 10.0, Vector::ZERO);
        let bodies = &mut scene.bodies;

        let (second, first) = bodies.pair_mut(b, a).unwrap();
        assert_eq!((second.id(), first.id()), (b, a));
        assert!(bodies.pair_mut(a, a).is_none());
        assert!(bodies.pair_mut(a, BodyId(77)).is_none());
    }
}
