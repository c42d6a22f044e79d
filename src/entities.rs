//! Game entities: the info payload carried by every body and the factories
//! that build ships, pilots, bullets, asteroids and walls

use serde::{Deserialize, Serialize};

use crate::config::BotConfig;
use crate::consts::*;
use crate::error::SimError;
use crate::sim::vector::from_polar;
use crate::sim::{Body, Vector, make_circle, make_circle_with, make_iso_triangle, make_rectangle};

/// Role of a body in the duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Pilot,
    Bullet,
    Asteroid,
    Wall,
    Background,
}

/// Payload attached to every body in the duel scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub kind: EntityKind,
    /// Owning player for ships, pilots and bullets
    pub player: Option<usize>,
    /// Seconds left before the body expires (bullets)
    pub lifetime: Option<f64>,
}

impl EntityInfo {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            player: None,
            lifetime: None,
        }
    }

    pub fn owned(kind: EntityKind, player: usize) -> Self {
        Self {
            kind,
            player: Some(player),
            lifetime: None,
        }
    }
}

pub type Entity = Body<EntityInfo>;

fn player_color(player: usize) -> crate::sim::Color {
    PLAYER_COLORS[player % PLAYER_COLORS.len()]
}

/// Unit vector a body with this rotation faces (0 = +x)
pub fn heading(rotation: f64) -> Vector {
    from_polar(1.0, rotation)
}

pub fn kind_of(body: &Entity) -> Option<EntityKind> {
    body.info().map(|info| info.kind)
}

pub fn player_of(body: &Entity) -> Option<usize> {
    body.info().and_then(|info| info.player)
}

pub fn lifetime_of(body: &Entity) -> Option<f64> {
    body.info().and_then(|info| info.lifetime)
}

/// Bodies that block bullet paths
pub fn is_obstacle(body: &Entity) -> bool {
    kind_of(body) == Some(EntityKind::Wall)
}

/// Distance from the ship centroid to its farthest vertex
pub fn ship_effective_radius(base: f64, height: f64) -> f64 {
    let apex = 2.0 * height / 3.0;
    let corner = ((height / 3.0).powi(2) + (base / 2.0).powi(2)).sqrt();
    apex.max(corner)
}

pub fn make_ship(centroid: Vector, player: usize, velocity: Vector) -> Result<Entity, SimError> {
    let mut ship = Body::with_info(
        make_iso_triangle(centroid, SHIP_BASE, SHIP_HEIGHT),
        SHIP_MASS,
        player_color(player),
        EntityInfo::owned(EntityKind::Ship, player),
    )?;
    ship.set_velocity(velocity);
    Ok(ship)
}

pub fn make_pilot(centroid: Vector, player: usize, velocity: Vector) -> Result<Entity, SimError> {
    let mut pilot = Body::with_info(
        make_rectangle(centroid, PILOT_WIDTH, PILOT_HEIGHT),
        PILOT_MASS,
        player_color(player),
        EntityInfo::owned(EntityKind::Pilot, player),
    )?;
    pilot.set_velocity(velocity);
    Ok(pilot)
}

/// Mass scales with the circle's area
pub fn make_asteroid(centroid: Vector, radius: f64, velocity: Vector) -> Result<Entity, SimError> {
    let shape = make_circle(centroid, radius);
    let area = crate::sim::polygon::area_of(&shape);
    let mut asteroid = Body::with_info(
        shape,
        area * ASTEROID_DENSITY,
        GRAY,
        EntityInfo::new(EntityKind::Asteroid),
    )?;
    asteroid.set_velocity(velocity);
    Ok(asteroid)
}

/// Immovable rectangle
pub fn make_wall(centroid: Vector, width: f64, height: f64) -> Result<Entity, SimError> {
    Body::with_info(
        make_rectangle(centroid, width, height),
        f64::INFINITY,
        WHITE,
        EntityInfo::new(EntityKind::Wall),
    )
}

/// Where a bullet fired by a ship at `centroid` facing `rotation` appears
pub fn bullet_spawn(centroid: Vector, rotation: f64, config: &BotConfig) -> (Vector, Vector) {
    let dir = heading(rotation);
    (centroid + dir * config.bullet_spawn_offset, dir * config.bullet_speed)
}

/// Bullet fired from the shooter's nose along its heading
pub fn make_bullet(shooter: &Entity, config: &BotConfig) -> Result<Entity, SimError> {
    let (position, velocity) = bullet_spawn(shooter.centroid(), shooter.rotation(), config);
    let player = player_of(shooter);
    let color = player.map(player_color).unwrap_or(WHITE);
    let mut bullet = Body::with_info(
        make_circle_with(position, config.bullet_radius, BULLET_POINTS),
        BULLET_MASS,
        color,
        EntityInfo {
            kind: EntityKind::Bullet,
            player,
            lifetime: Some(config.bullet_lifetime),
        },
    )?;
    bullet.set_velocity(velocity);
    Ok(bullet)
}
