//! Game constants used by the bot and the duel loop
//!
//! Persisted as JSON; missing fields fall back to the `consts` defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Tunable constants shared by the duel loop and the bot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    // === Bullets ===
    /// Muzzle speed along the ship heading
    pub bullet_speed: f64,
    pub bullet_radius: f64,
    /// Distance in front of the ship centroid where bullets appear
    pub bullet_spawn_offset: f64,
    /// Seconds before a bullet expires; bounds the prediction horizon
    pub bullet_lifetime: f64,

    // === Ships ===
    pub ship_base: f64,
    pub ship_height: f64,
    /// Radians per second while turning
    pub ship_rot_speed: f64,

    // === Input ===
    pub double_tap_threshold: f64,
    /// Frame step the bot assumes when looking one tick ahead
    pub dt: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            bullet_spawn_offset: 2.0 * SHIP_HEIGHT / 3.0 + BULLET_RADIUS + 1.0,
            bullet_lifetime: BULLET_LIFETIME,

            ship_base: SHIP_BASE,
            ship_height: SHIP_HEIGHT,
            ship_rot_speed: SHIP_ROT_SPEED,

            double_tap_threshold: DOUBLE_TAP_THRESHOLD,
            dt: SIM_DT,
        }
    }
}

impl BotConfig {
    /// Farthest a bullet can travel before expiring
    pub fn bullet_range(&self) -> f64 {
        self.bullet_speed * self.bullet_lifetime
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from a JSON file, or use defaults if it can't be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config ({e})");
                Self::default()
            }
        }
    }

    /// Save as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
