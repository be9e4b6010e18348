//! Seek agent that chases a moving target for a limited time

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Homing enemy: re-aims at its target every tick until its lifetime runs out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomingAgent {
    pub pos: Vec2,
    /// Speed in px/s
    pub speed: f32,
    /// Seconds left before the agent expires
    pub lifetime: f32,
    /// Unit direction used on the last tick (zero when on top of the target)
    pub direction: Vec2,
    alive: bool,
}

impl HomingAgent {
    /// Default chase speed, 4 px per tick at 60 Hz
    pub const DEFAULT_SPEED: f32 = 240.0;
    /// Default lifetime in seconds
    pub const DEFAULT_LIFETIME: f32 = 5.0;

    pub fn new(pos: Vec2, speed: f32, lifetime: f32) -> Self {
        Self {
            pos,
            speed,
            lifetime,
            direction: Vec2::ZERO,
            alive: true,
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Step toward `target` and burn lifetime. Returns whether still alive.
    ///
    /// Expiry is independent of reaching the target.
    pub fn update(&mut self, dt: f32, target: Vec2) -> bool {
        if !self.alive {
            return false;
        }

        let to_target = target - self.pos;
        let dist = to_target.length();
        self.direction = to_target.normalize_or_zero();
        self.pos += self.direction * (self.speed * dt).min(dist);

        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            log::debug!("homing agent expired at {:?}", self.pos);
            self.alive = false;
        }
        self.alive
    }
}
