//! Errors raised while building levels or loading configuration
//!
//! The simulation itself never fails; only the data fed into it can.

use thiserror::Error;

/// Problems loading or validating [`crate::settings::Tuning`] and difficulty data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown difficulty preset: {0:?}")]
    UnknownDifficulty(String),

    #[error("unknown game mode: {0:?}")]
    UnknownMode(String),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Problems building a [`crate::sim::level::Level`] from its description
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("wall {index} has negative size ({w} x {h})")]
    NegativeWallSize { index: usize, w: f32, h: f32 },

    #[error("wall {index} has non-finite coordinates")]
    NonFiniteWall { index: usize },

    #[error("path {path} references unknown waypoint {id:?}")]
    UnknownWaypoint { path: usize, id: String },

    #[error("waypoint {id:?} is defined more than once")]
    DuplicateWaypoint { id: String },
}
