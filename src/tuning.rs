//! Data-driven game balance
//!
//! Every number the simulation depends on lives here so a round can be
//! replayed or rebalanced from a JSON file without touching code.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::ObstacleKind;

/// Relative spawn weights per obstacle variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub plain: f64,
    pub shield: f64,
    pub instant_kill: f64,
    pub full_health: f64,
    pub double_health: f64,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        let weight = |kind: ObstacleKind| kind.spec().default_weight;
        Self {
            plain: weight(ObstacleKind::Plain),
            shield: weight(ObstacleKind::Shield),
            instant_kill: weight(ObstacleKind::InstantKill),
            full_health: weight(ObstacleKind::FullHealth),
            double_health: weight(ObstacleKind::DoubleHealth),
        }
    }
}

impl SpawnWeights {
    /// Weights in `ObstacleKind::ALL` order
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.plain,
            self.shield,
            self.instant_kill,
            self.full_health,
            self.double_health,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub display_width: f32,
    pub display_height: f32,

    // === Player ===
    pub player_size: Vec2,
    pub player_speed: f32,
    pub player_health: i32,
    pub player_damage: i32,

    // === Projectiles ===
    pub projectile_size: Vec2,
    /// Base speed; each tick a projectile moves `random() * base * 2`
    pub projectile_speed: f32,
    pub max_projectiles: usize,

    // === Obstacles ===
    pub asteroid_small_size: Vec2,
    pub asteroid_big_size: Vec2,
    pub icon_size: Vec2,
    pub obstacle_max_speed: f32,
    pub obstacle_health: i32,
    pub obstacle_damage: i32,
    pub spawn_weights: SpawnWeights,
    /// 0 disables interval spawning
    pub spawn_interval_ticks: u64,

    // === Attachments ===
    pub attachment_duration_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            display_width: DISPLAY_WIDTH,
            display_height: DISPLAY_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_health: PLAYER_HEALTH,
            player_damage: PLAYER_DAMAGE,

            projectile_size: PROJECTILE_SIZE,
            projectile_speed: PROJECTILE_SPEED,
            max_projectiles: MAX_PROJECTILES,

            asteroid_small_size: ASTEROID_SMALL_SIZE,
            asteroid_big_size: ASTEROID_BIG_SIZE,
            icon_size: ICON_SIZE,
            obstacle_max_speed: OBSTACLE_MAX_SPEED,
            obstacle_health: OBSTACLE_HEALTH,
            obstacle_damage: OBSTACLE_DAMAGE,
            spawn_weights: SpawnWeights::default(),
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,

            attachment_duration_ticks: ATTACHMENT_DURATION_TICKS,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.display_width > 0.0 && self.display_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "play area must be positive, got {}x{}",
                self.display_width, self.display_height
            )));
        }
        // The ship spawns one ship-height above the bottom edge
        let ship = self.player_size;
        let fits = ship.x <= self.display_width && ship.y * 1.5 <= self.display_height;
        if !(ship.x > 0.0 && ship.y > 0.0 && fits) {
            return Err(ConfigError::Invalid(format!(
                "player_size {}x{} does not fit the play area",
                ship.x, ship.y
            )));
        }
        if self.max_projectiles == 0 {
            return Err(ConfigError::Invalid("max_projectiles must be at least 1".into()));
        }
        for (name, speed) in [
            ("player_speed", self.player_speed),
            ("projectile_speed", self.projectile_speed),
            ("obstacle_max_speed", self.obstacle_max_speed),
        ] {
            if !speed.is_finite() || speed < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be finite and >= 0")));
            }
        }
        if self.player_health <= 0 {
            return Err(ConfigError::Invalid("player_health must start positive".into()));
        }
        let weights = self.spawn_weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || weights.iter().all(|w| *w == 0.0) {
            return Err(ConfigError::Invalid(
                "spawn weights must be non-negative with at least one positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "player_speed": 10.0, "spawn_weights": { "shield": 2.0 } }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.player_speed, 10.0);
        assert_eq!(tuning.spawn_weights.shield, 2.0);
        assert_eq!(tuning.spawn_weights.plain, 100.0);
        assert_eq!(tuning.max_projectiles, MAX_PROJECTILES);
    }

    #[test]
    fn test_rejects_zero_weights() {
        let json = r#"{ "spawn_weights": { "plain": 0.0, "shield": 0.0, "instant_kill": 0.0,
            "full_health": 0.0, "double_health": 0.0 } }"#;
        assert!(matches!(Tuning::from_json(json), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_area_and_cap() {
        assert!(matches!(
            Tuning::from_json(r#"{ "display_width": 0.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "max_projectiles": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_ship_that_cannot_spawn_inside() {
        for json in [
            r#"{ "player_size": [0.0, 64.0] }"#,
            r#"{ "player_size": [64.0, -1.0] }"#,
            r#"{ "player_size": [900.0, 64.0] }"#,
            r#"{ "player_size": [64.0, 500.0] }"#,
        ] {
            assert!(
                matches!(Tuning::from_json(json), Err(ConfigError::Invalid(_))),
                "{json}"
            );
        }
        assert!(Tuning::from_json(r#"{ "player_size": [64.0, 400.0] }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Tuning::load("/nonexistent/interstellar-tuning.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
