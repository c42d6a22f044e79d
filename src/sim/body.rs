//! Rigid bodies and their per-tick integration

use super::polygon::{Color, Polygon};
use super::scene::BodyId;
use super::vector::Vector;
use crate::error::SimError;

/// A physical entity: a polygon plus mass, inertia and force accumulators
///
/// `I` is the caller's payload type (entity role, team, ...). The core never
/// inspects it; it is dropped together with the body.
#[derive(Debug, Clone)]
pub struct Body<I = ()> {
    id: BodyId,
    polygon: Polygon,
    /// `f64::INFINITY` for immovable bodies
    mass: f64,
    rotational_inertia: f64,
    /// Tracked separately so lookups don't walk the point list
    centroid: Vector,
    force: Vector,
    torque: f64,
    impulse: Vector,
    rot_impulse: f64,
    removed: bool,
    info: Option<I>,
}

impl<I> Body<I> {
    /// Create a body with no payload
    pub fn new(shape: Vec<Vector>, mass: f64, color: Color) -> Result<Self, SimError> {
        Self::build(shape, mass, color, None)
    }

    /// Create a body carrying an info payload
    pub fn with_info(shape: Vec<Vector>, mass: f64, color: Color, info: I) -> Result<Self, SimError> {
        Self::build(shape, mass, color, Some(info))
    }

    fn build(shape: Vec<Vector>, mass: f64, color: Color, info: Option<I>) -> Result<Self, SimError> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(SimError::InvalidMass { mass });
        }
        let polygon = Polygon::new(shape, Vector::ZERO, 0.0, color)?;
        let centroid = polygon.centroid();
        let rotational_inertia = polygon.rotational_inertia(mass);
        Ok(Self {
            id: BodyId::UNASSIGNED,
            polygon,
            mass,
            rotational_inertia,
            centroid,
            force: Vector::ZERO,
            torque: 0.0,
            impulse: Vector::ZERO,
            rot_impulse: 0.0,
            removed: false,
            info,
        })
    }

    /// Scene-assigned id (`BodyId::UNASSIGNED` until added to a scene)
    pub fn id(&self) -> BodyId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: BodyId) {
        self.id = id;
    }

    pub fn add_force(&mut self, force: Vector) {
        self.force += force;
    }

    pub fn add_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    pub fn add_impulse(&mut self, impulse: Vector) {
        self.impulse += impulse;
    }

    pub fn add_rot_impulse(&mut self, rot_impulse: f64) {
        self.rot_impulse += rot_impulse;
    }

    /// Clear all four accumulators
    pub fn reset(&mut self) {
        self.force = Vector::ZERO;
        self.torque = 0.0;
        self.impulse = Vector::ZERO;
        self.rot_impulse = 0.0;
    }

    /// Integrate accumulated forces and impulses over `dt`
    ///
    /// Position advances with the average of the old and new velocities;
    /// afterwards the polygon carries the new velocity.
    pub fn tick(&mut self, dt: f64) {
        let v0 = self.polygon.velocity();
        let w0 = self.polygon.rotation_speed();

        let v1 = v0 + self.force * (dt / self.mass) + self.impulse / self.mass;
        let w1 = w0
            + self.torque * (dt / self.rotational_inertia)
            + self.rot_impulse / self.rotational_inertia;

        let v_avg = (v0 + v1) * 0.5;
        let w_avg = (w0 + w1) * 0.5;

        self.polygon.set_velocity(v_avg);
        self.polygon.set_rotation_speed(w_avg);
        self.polygon.step(dt);
        self.polygon.set_velocity(v1);
        self.polygon.set_rotation_speed(w1);

        self.centroid += v_avg * dt;
        self.reset();
    }

    /// Mark for removal; the scene drops it on its next tick
    pub fn remove(&mut self) {
        self.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Copy of the current world-space points
    pub fn shape(&self) -> Vec<Vector> {
        self.polygon.points().to_vec()
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn centroid(&self) -> Vector {
        self.centroid
    }

    pub fn set_centroid(&mut self, centroid: Vector) {
        self.polygon.set_center(centroid);
        self.centroid = centroid;
    }

    pub fn velocity(&self) -> Vector {
        self.polygon.velocity()
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.polygon.set_velocity(velocity);
    }

    pub fn rotation(&self) -> f64 {
        self.polygon.rotation()
    }

    pub fn set_rotation(&mut self, angle: f64) {
        self.polygon.set_rotation(angle);
    }

    pub fn rotation_speed(&self) -> f64 {
        self.polygon.rotation_speed()
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f64) {
        self.polygon.set_rotation_speed(rotation_speed);
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn rotational_inertia(&self) -> f64 {
        self.rotational_inertia
    }

    /// Override the inertia derived from the shape (`f64::INFINITY` locks rotation)
    pub fn set_rotational_inertia(&mut self, rotational_inertia: f64) -> Result<(), SimError> {
        if rotational_inertia.is_nan() || rotational_inertia <= 0.0 {
            return Err(SimError::InvalidInertia {
                inertia: rotational_inertia,
            });
        }
        self.rotational_inertia = rotational_inertia;
        Ok(())
    }

    pub fn color(&self) -> Color {
        self.polygon.color()
    }

    pub fn set_color(&mut self, color: Color) {
        self.polygon.set_color(color);
    }

    pub fn info(&self) -> Option<&I> {
        self.info.as_ref()
    }

    pub fn info_mut(&mut self) -> Option<&mut I> {
        self.info.as_mut()
    }
}
