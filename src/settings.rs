//! Difficulty presets and physics tuning
//!
//! Gravity and the other shared constants live in [`Tuning`] so the trajectory
//! preview and the projectile integrator always read the same value.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::geometry::Rect;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Which scene a session plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Slingshot,
    Survival,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Slingshot => "slingshot",
            Mode::Survival => "survival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slingshot" => Some(Mode::Slingshot),
            "survival" => Some(Mode::Survival),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

/// Parameters a difficulty preset supplies to a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    /// Launches available in a session
    pub attempts: u32,
    /// Session duration in seconds
    pub time_limit: f32,
    /// Multiplier applied to every spawned patrol agent's speed
    pub enemy_speed_scale: f32,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Like [`Difficulty::from_str`] but reports unknown names as an error
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        Self::from_str(s).ok_or_else(|| ConfigError::UnknownDifficulty(s.to_string()))
    }

    pub fn params(&self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                attempts: 10,
                time_limit: 120.0,
                enemy_speed_scale: 0.8,
            },
            Difficulty::Normal => DifficultyParams {
                attempts: 7,
                time_limit: 90.0,
                enemy_speed_scale: 1.0,
            },
            Difficulty::Hard => DifficultyParams {
                attempts: 5,
                time_limit: 60.0,
                enemy_speed_scale: 1.4,
            },
        }
    }
}

impl DifficultyParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit.is_nan() || self.time_limit <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "time_limit",
                value: self.time_limit,
            });
        }
        if self.enemy_speed_scale.is_nan() || self.enemy_speed_scale <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "enemy_speed_scale",
                value: self.enemy_speed_scale,
            });
        }
        Ok(())
    }
}

/// Shared physics and launch tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical acceleration in px/s² (negative pulls down)
    pub gravity: f32,

    // === Projectile ===
    /// Side length of the square projectile box
    pub projectile_size: f32,
    /// Whether projectiles bounce off walls instead of bursting
    pub bounce_enabled: bool,
    /// Fraction of speed kept on a bounce (0..=1)
    pub restitution: f32,
    /// Seconds a projectile may fly while attempts remain
    pub projectile_ttl: f32,
    /// Seconds the final projectile may fly
    pub last_shot_ttl: f32,

    // === Launch ===
    /// Longest drag (px) that still adds power
    pub max_drag_distance: f32,
    /// Drag px to launch velocity factor
    pub launch_power: f32,

    // === Patrol ===
    /// Patrol speed in px/s before the difficulty scale
    pub patrol_speed: f32,
    /// Side length of a patrol agent's square hit box
    pub agent_size: f32,
    /// Seconds an agent stays visible after being hit
    pub fade_duration: f32,

    // === Playfield ===
    pub field_width: f32,
    pub field_height: f32,
    pub cull_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: -150.0,

            projectile_size: 38.0,
            bounce_enabled: false,
            restitution: 0.5,
            projectile_ttl: 8.0,
            last_shot_ttl: 4.0,

            max_drag_distance: 180.0,
            launch_power: 7.5,

            patrol_speed: 3.0 * TICK_HZ,
            agent_size: 100.0,
            fade_duration: 0.28,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            cull_margin: CULL_MARGIN,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning (gravity {}, bounce {})",
            tuning.gravity,
            tuning.bounce_enabled
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, f32, bool); 13] = [
            ("gravity", self.gravity, self.gravity < 0.0),
            (
                "restitution",
                self.restitution,
                (0.0..=1.0).contains(&self.restitution),
            ),
            ("projectile_size", self.projectile_size, self.projectile_size > 0.0),
            ("projectile_ttl", self.projectile_ttl, self.projectile_ttl > 0.0),
            ("last_shot_ttl", self.last_shot_ttl, self.last_shot_ttl > 0.0),
            (
                "max_drag_distance",
                self.max_drag_distance,
                self.max_drag_distance > 0.0,
            ),
            ("launch_power", self.launch_power, self.launch_power > 0.0),
            ("patrol_speed", self.patrol_speed, self.patrol_speed >= 0.0),
            ("agent_size", self.agent_size, self.agent_size > 0.0),
            ("fade_duration", self.fade_duration, self.fade_duration >= 0.0),
            ("field_width", self.field_width, self.field_width > 0.0),
            ("field_height", self.field_height, self.field_height > 0.0),
            ("cull_margin", self.cull_margin, self.cull_margin >= 0.0),
        ];
        for (field, value, ok) in checks {
            if !ok {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// The playfield as a rectangle anchored at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.field_width, self.field_height)
    }

    /// Projectile TTL given whether more launches remain
    pub fn ttl_for(&self, attempts_left: u32) -> f32 {
        if attempts_left == 0 {
            self.last_shot_ttl
        } else {
            self.projectile_ttl
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
        assert!(matches!(
            Difficulty::parse("nightmare"),
            Err(ConfigError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::parse("Survival").ok(), Some(Mode::Survival));
        assert_eq!(Mode::parse("slingshot").ok(), Some(Mode::Slingshot));
        assert!(matches!(
            Mode::parse("arcade"),
            Err(ConfigError::UnknownMode(name)) if name == "arcade"
        ));
    }

    #[test]
    fn test_presets_scale_with_difficulty() {
        let easy = Difficulty::Easy.params();
        let hard = Difficulty::Hard.params();
        assert!(easy.attempts > hard.attempts);
        assert!(easy.time_limit > hard.time_limit);
        assert!(easy.enemy_speed_scale < hard.enemy_speed_scale);
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert!(d.params().validate().is_ok());
        }
    }

    #[test]
    fn test_tuning_json_defaults_missing_fields() {
        let tuning = Tuning::from_json(r#"{ "gravity": -980.0, "bounce_enabled": true }"#)
            .expect("valid tuning");
        assert_eq!(tuning.gravity, -980.0);
        assert!(tuning.bounce_enabled);
        assert_eq!(tuning.max_drag_distance, 180.0);
    }

    #[test]
    fn test_tuning_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "restitution": 1.5 }"#),
            Err(ConfigError::OutOfRange { field: "restitution", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "gravity": 10.0 }"#),
            Err(ConfigError::OutOfRange { field: "gravity", .. })
        ));
        for json in [
            r#"{ "launch_power": -1.0 }"#,
            r#"{ "field_width": 0.0 }"#,
            r#"{ "field_height": -960.0 }"#,
            r#"{ "cull_margin": -5.0 }"#,
            r#"{ "fade_duration": -0.1 }"#,
        ] {
            assert!(
                matches!(Tuning::from_json(json), Err(ConfigError::OutOfRange { .. })),
                "accepted {json}"
            );
        }
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_tuning_round_trips_through_json() {
        let json = Tuning::default().to_json().expect("serializable");
        let back = Tuning::from_json(&json).expect("parses");
        assert_eq!(back.launch_power, 7.5);
    }

    #[test]
    fn test_last_shot_ttl_is_shorter() {
        let t = Tuning::default();
        assert!(t.ttl_for(0) < t.ttl_for(3));
    }
}
