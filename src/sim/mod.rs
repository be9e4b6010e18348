//! Deterministic simulation module
//!
//! All motion and steering logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, seconds
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod agent;
pub mod bolt;
pub mod collision;
pub mod flocking;
pub mod geometry;
pub mod homing;
pub mod level;
pub mod patrol;
pub mod projectile;
pub mod raider;
pub mod slingshot;
pub mod spawn;
pub mod survival;
pub mod trajectory;

pub use agent::Agent;
pub use bolt::Bolt;
pub use collision::{CollisionResult, resolve};
pub use flocking::{
    Boid, FlockAgent, FlockConfig, FlockRadii, FlockWeights, flock_forces, step_flock,
};
pub use geometry::{Rect, intersects_any, segment_intersects_rect, segments_intersect};
pub use homing::HomingAgent;
pub use level::{Level, LevelSpec};
pub use patrol::{PatrolAgent, PatrolState, Waypoint};
pub use projectile::Projectile;
pub use raider::{Blaster, Raider, RaiderKind, RaiderMotion, Shooter};
pub use slingshot::{LossReason, Outcome, SlingshotEvent, SlingshotInput, SlingshotScene};
pub use spawn::SpawnPolicy;
pub use survival::{Hazard, Player, SurvivalConfig, SurvivalEvent, SurvivalInput, SurvivalScene};
pub use trajectory::{DragState, launch_velocity, trajectory_points};
