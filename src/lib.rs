//! Condor Flight - motion and steering core for a slingshot arcade game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (collision, projectiles, patrols, flocking, scenes)
//! - `settings`: Difficulty presets and shared physics tuning
//! - `error`: Configuration and level construction errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, LevelError};
pub use settings::{Difficulty, DifficultyParams, Mode, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_HZ: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_HZ;

    /// Safety cap for the unit-step penetration correction, per axis
    pub const MAX_CORRECTION_STEPS: u32 = 50;
    /// Velocities below this magnitude count as "not moving" on an axis
    pub const VELOCITY_EPSILON: f32 = 0.001;

    /// Squared speed below which a bouncing projectile is spent
    pub const BOUNCE_ENERGY_THRESHOLD: f32 = 25.0;

    /// Distance at which a patrol agent counts as having reached its waypoint
    pub const ARRIVAL_THRESHOLD: f32 = 4.0;

    /// Default flocking radii
    pub const SEPARATION_RADIUS: f32 = 100.0;
    pub const ALIGNMENT_RADIUS: f32 = 150.0;
    pub const COHESION_RADIUS: f32 = 200.0;

    /// Steering forces are per-tick² quantities; this converts them to px/s²
    pub const STEERING_GAIN: f32 = TICK_HZ * TICK_HZ;

    /// Default flocking weights
    pub const SEPARATION_WEIGHT: f32 = 3.0;
    pub const ALIGNMENT_WEIGHT: f32 = 1.2;
    pub const COHESION_WEIGHT: f32 = 0.8;

    /// Default playfield (portrait phone layout)
    pub const FIELD_WIDTH: f32 = 540.0;
    pub const FIELD_HEIGHT: f32 = 960.0;
    /// Margin outside the playfield before an entity is culled
    pub const CULL_MARGIN: f32 = 50.0;
}

/// Clamp a vector's length to `max`, keeping its direction
#[inline]
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max && len_sq > 0.0 {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Heading of a direction vector in degrees, measured from +X toward +Y
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}
