//! Boid steering: separation, alignment and cohesion
//!
//! Forces for a whole flock are computed from one snapshot of positions and
//! velocities before any agent moves, so the result does not depend on the
//! order agents are stored in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::geometry::Rect;
use crate::consts::*;

/// Neighborhood radius for each rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockRadii {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
}

impl Default for FlockRadii {
    fn default() -> Self {
        Self {
            separation: SEPARATION_RADIUS,
            alignment: ALIGNMENT_RADIUS,
            cohesion: COHESION_RADIUS,
        }
    }
}

/// Blend weights for each rule, plus an optional pull toward a target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockWeights {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    /// Weight of the unit vector toward the shared target (0 disables)
    pub seek: f32,
}

impl Default for FlockWeights {
    fn default() -> Self {
        Self {
            separation: SEPARATION_WEIGHT,
            alignment: ALIGNMENT_WEIGHT,
            cohesion: COHESION_WEIGHT,
            seek: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlockConfig {
    pub radii: FlockRadii,
    pub weights: FlockWeights,
}

/// What an agent can observe about a neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Push away from every neighbor inside `radius`, weighted by 1/d²
pub fn separation(pos: Vec2, neighbors: &[Boid], radius: f32) -> Vec2 {
    let mut steer = Vec2::ZERO;
    let mut count = 0;
    for other in neighbors {
        let away = pos - other.pos;
        let d_sq = away.length_squared();
        if d_sq > 0.0 && d_sq < radius * radius {
            steer += away / d_sq;
            count += 1;
        }
    }
    if count > 0 {
        steer / count as f32
    } else {
        Vec2::ZERO
    }
}

/// Match the mean velocity of neighbors inside `radius`
pub fn alignment(pos: Vec2, vel: Vec2, neighbors: &[Boid], radius: f32) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    for other in neighbors {
        let d_sq = pos.distance_squared(other.pos);
        if d_sq > 0.0 && d_sq < radius * radius {
            sum += other.vel;
            count += 1;
        }
    }
    if count > 0 {
        sum / count as f32 - vel
    } else {
        Vec2::ZERO
    }
}

/// Unit vector toward the centroid of neighbors inside `radius`
pub fn cohesion(pos: Vec2, neighbors: &[Boid], radius: f32) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0;
    for other in neighbors {
        let d_sq = pos.distance_squared(other.pos);
        if d_sq > 0.0 && d_sq < radius * radius {
            sum += other.pos;
            count += 1;
        }
    }
    if count > 0 {
        (sum / count as f32 - pos).normalize_or_zero()
    } else {
        Vec2::ZERO
    }
}

/// Weighted blend of the three rules (and the seek pull, when a target is given)
pub fn steering(
    boid: &Boid,
    neighbors: &[Boid],
    target: Option<Vec2>,
    config: &FlockConfig,
) -> Vec2 {
    let FlockConfig { radii, weights } = config;
    let mut force = separation(boid.pos, neighbors, radii.separation) * weights.separation
        + alignment(boid.pos, boid.vel, neighbors, radii.alignment) * weights.alignment
        + cohesion(boid.pos, neighbors, radii.cohesion) * weights.cohesion;
    if let Some(target) = target
        && weights.seek != 0.0
    {
        force += (target - boid.pos).normalize_or_zero() * weights.seek;
    }
    force
}

/// An enemy that moves with the flock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlockAgent {
    pub id: u32,
    pub agent: Agent,
    /// Takes part in flocking (both as subject and as neighbor)
    pub use_flocking: bool,
    /// Steers toward the shared target when one is supplied
    pub seek_target: bool,
}

impl FlockAgent {
    /// Default limits: 240 px/s, unit steering force
    pub const DEFAULT_MAX_SPEED: f32 = 240.0;
    pub const DEFAULT_MAX_FORCE: f32 = 1.0;

    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            agent: Agent::new(pos, vel, Self::DEFAULT_MAX_SPEED, Self::DEFAULT_MAX_FORCE),
            use_flocking: true,
            seek_target: false,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.agent.pos
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.agent.alive()
    }

    pub fn boid(&self) -> Boid {
        Boid {
            id: self.id,
            pos: self.agent.pos,
            vel: self.agent.vel,
        }
    }

    /// Apply `force`, integrate, and retire the agent if it strays past
    /// `margin` outside `bounds`. Returns whether it is still alive.
    pub fn update(&mut self, dt: f32, force: Vec2, bounds: &Rect, margin: f32) -> bool {
        if !self.agent.alive() {
            return false;
        }
        self.agent.apply_force(force);
        self.agent.integrate(dt);
        if !bounds.expand(margin).contains_point(self.agent.pos) {
            log::debug!("flock agent {} left the field at {:?}", self.id, self.agent.pos);
            self.agent.kill();
        }
        self.agent.alive()
    }
}

/// Margin outside the field before a flock agent is retired
pub const FLOCK_CULL_MARGIN: f32 = 4.0 * CULL_MARGIN;

/// Steering force for every agent in `flock`, in iteration order
///
/// Only living agents with `use_flocking` are neighbors. Agents not flocking
/// still receive their seek pull.
pub fn flock_forces<'a, I>(flock: I, target: Option<Vec2>, config: &FlockConfig) -> Vec<Vec2>
where
    I: IntoIterator<Item = &'a FlockAgent>,
    I::IntoIter: Clone,
{
    let flock = flock.into_iter();
    let neighbors: Vec<Boid> = flock
        .clone()
        .filter(|a| a.use_flocking && a.alive())
        .map(FlockAgent::boid)
        .collect();

    flock
        .map(|a| {
            if !a.alive() {
                return Vec2::ZERO;
            }
            let target = if a.seek_target { target } else { None };
            if a.use_flocking {
                let others: Vec<Boid> =
                    neighbors.iter().filter(|b| b.id != a.id).copied().collect();
                steering(&a.boid(), &others, target, config)
            } else {
                steering(&a.boid(), &[], target, config)
            }
        })
        .collect()
}

/// Advance a whole flock one tick; dead agents are left for the owner to purge
pub fn step_flock(
    flock: &mut [FlockAgent],
    target: Option<Vec2>,
    config: &FlockConfig,
    bounds: &Rect,
    dt: f32,
) {
    let forces = flock_forces(flock.iter(), target, config);
    for (agent, force) in flock.iter_mut().zip(forces) {
        agent.update(dt, force, bounds, FLOCK_CULL_MARGIN);
    }
}
