//! Game configuration
//!
//! Timing constants and enemy templates are data, not code. Defaults match
//! the shipped game; the browser build can override them from LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{BehaviorKind, EnemyTypeSpec};

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of every entity square (pixels)
    pub box_size: f32,
    /// Player movement per tick (pixels)
    pub player_speed: f32,
    /// Health at session start
    pub max_health: u8,

    // === Timers ===
    /// How long an enemy stays stunned after damaging the player
    pub collision_stun_ms: f64,
    /// Player invulnerability after taking damage
    pub player_immunity_ms: f64,

    // === Progression ===
    /// Every positive multiple of this score spawns one more enemy
    pub spawn_milestone: u64,
    /// Retry ceiling for spawn placement
    pub placement_max_attempts: u32,

    // === Enemies ===
    /// Template of the enemy present at session start
    pub initial_enemy: EnemyTypeSpec,
    /// Templates drawn uniformly at each milestone
    pub milestone_roster: Vec<EnemyTypeSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            box_size: BOX_SIZE,
            player_speed: PLAYER_SPEED,
            max_health: MAX_HEALTH,

            collision_stun_ms: COLLISION_STUN_MS,
            player_immunity_ms: PLAYER_IMMUNITY_MS,

            spawn_milestone: SPAWN_MILESTONE,
            placement_max_attempts: PLACEMENT_MAX_ATTEMPTS,

            initial_enemy: EnemyTypeSpec::BASIC,
            milestone_roster: vec![EnemyTypeSpec::BASIC, EnemyTypeSpec::RUSHER],
        }
    }
}

fn check(ok: bool, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid(reason.to_string()))
    }
}

fn check_template(spec: &EnemyTypeSpec) -> Result<(), ConfigError> {
    check(
        spec.speed.is_finite() && spec.speed > 0.0,
        "enemy speed must be positive",
    )?;
    if let BehaviorKind::RushStraight {
        targeting_ms,
        rush_delay_ms,
    } = spec.behavior
    {
        check(
            targeting_ms.is_finite() && targeting_ms >= 0.0,
            "targeting_ms must be non-negative",
        )?;
        check(
            rush_delay_ms.is_finite() && rush_delay_ms >= 0.0,
            "rush_delay_ms must be non-negative",
        )?;
    }
    Ok(())
}

impl GameConfig {
    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            self.box_size.is_finite() && self.box_size > 0.0,
            "box_size must be positive",
        )?;
        check(
            self.player_speed.is_finite() && self.player_speed > 0.0,
            "player_speed must be positive",
        )?;
        check(self.max_health > 0, "max_health must be at least 1")?;
        check(
            self.collision_stun_ms.is_finite() && self.collision_stun_ms >= 0.0,
            "collision_stun_ms must be non-negative",
        )?;
        check(
            self.player_immunity_ms.is_finite() && self.player_immunity_ms >= 0.0,
            "player_immunity_ms must be non-negative",
        )?;
        check(self.spawn_milestone > 0, "spawn_milestone must be at least 1")?;
        check(
            self.placement_max_attempts > 0,
            "placement_max_attempts must be at least 1",
        )?;
        check(
            !self.milestone_roster.is_empty(),
            "milestone_roster must not be empty",
        )?;
        check_template(&self.initial_enemy)?;
        for spec in &self.milestone_roster {
            check_template(spec)?;
        }
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "box_survivor_config";

    /// Load an override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config override from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_health, 4);
        assert_eq!(config.spawn_milestone, 10);
        assert_eq!(config.milestone_roster.len(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig {
            collision_stun_ms: 1200.0,
            ..GameConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(json.contains("\"kind\": \"rush_straight\""));
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = GameConfig::from_json(r#"{ "player_speed": 3.5 }"#).unwrap();
        assert_eq!(config.player_speed, 3.5);
        assert_eq!(config.box_size, BOX_SIZE);
        assert_eq!(config.initial_enemy, EnemyTypeSpec::BASIC);
    }

    #[test]
    fn test_rejects_bad_values() {
        let empty_roster = r#"{ "milestone_roster": [] }"#;
        assert!(matches!(
            GameConfig::from_json(empty_roster),
            Err(ConfigError::Invalid(_))
        ));

        let frozen_enemy = GameConfig {
            initial_enemy: EnemyTypeSpec {
                speed: 0.0,
                ..EnemyTypeSpec::BASIC
            },
            ..GameConfig::default()
        };
        assert!(frozen_enemy.validate().is_err());

        let negative_delay = GameConfig {
            milestone_roster: vec![EnemyTypeSpec {
                behavior: BehaviorKind::RushStraight {
                    targeting_ms: 100.0,
                    rush_delay_ms: -1.0,
                },
                ..EnemyTypeSpec::RUSHER
            }],
            ..GameConfig::default()
        };
        assert!(negative_delay.validate().is_err());

        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            GameConfig::from_path("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
