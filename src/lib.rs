//! Astro Duel - deterministic 2D rigid-body core for a two-ship arcade duel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vectors, polygons, bodies, scene, forces)
//! - `entities`: Entity payloads and factories (ships, bullets, walls, ...)
//! - `bot`: Interception predictor that drives a computer-controlled ship
//! - `input`: Explicit key-timing context consumed by the bot
//! - `config`: Data-driven game constants

pub mod bot;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod sim;

pub use config::BotConfig;
pub use error::{ConfigError, SimError};

/// Game configuration constants
pub mod consts {
    use crate::sim::Color;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f64 = 1000.0;
    pub const ARENA_HEIGHT: f64 = 500.0;
    pub const WALL_THICKNESS: f64 = 10.0;

    /// Number of vertices used to approximate a circle
    pub const CIRCLE_POINTS: usize = 80;

    /// Ship silhouette (isosceles triangle, apex forward)
    pub const SHIP_MASS: f64 = 10.0;
    pub const SHIP_BASE: f64 = 20.0;
    pub const SHIP_HEIGHT: f64 = 30.0;
    /// Turn rate while the turn control is held (radians per second)
    pub const SHIP_ROT_SPEED: f64 = 4.0;
    /// Linear drag applied to ships
    pub const SHIP_DRAG: f64 = 0.5;
    /// Forward impulse from a double tap on the turn control
    pub const SHIP_BOOST_IMPULSE: f64 = 1500.0;
    /// Minimum seconds between shots
    pub const FIRE_COOLDOWN: f64 = 0.4;
    /// Ship/ship and ship/wall bounce
    pub const SHIP_ELASTICITY: f64 = 0.5;

    /// Ejected pilot
    pub const PILOT_MASS: f64 = 5.0;
    pub const PILOT_WIDTH: f64 = 10.0;
    pub const PILOT_HEIGHT: f64 = 20.0;

    /// Asteroid mass per unit area
    pub const ASTEROID_DENSITY: f64 = 0.01;
    pub const ASTEROID_COUNT: usize = 6;
    pub const ASTEROID_MIN_RADIUS: f64 = 15.0;
    pub const ASTEROID_MAX_RADIUS: f64 = 35.0;
    pub const ASTEROID_MAX_SPEED: f64 = 40.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f64 = 400.0;
    pub const BULLET_RADIUS: f64 = 3.0;
    pub const BULLET_MASS: f64 = 1.0;
    /// Seconds a bullet survives; bounds the bot's prediction horizon
    pub const BULLET_LIFETIME: f64 = 2.0;
    /// Resolution of the bullet silhouette (small, so keep it cheap)
    pub const BULLET_POINTS: usize = 12;

    /// Two presses closer than this count as a double tap (seconds)
    pub const DOUBLE_TAP_THRESHOLD: f64 = 0.25;

    /// Gravity is skipped below this separation to avoid the singularity
    pub const MIN_GRAVITY_DISTANCE: f64 = 5.0;

    /// Player colors (index = player)
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const PLAYER_COLORS: [Color; 2] = [RED, BLUE];
    pub const GRAY: Color = Color::new(0.59, 0.59, 0.59);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
