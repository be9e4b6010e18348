//! Straight-flying bolts fired by raiders

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// A shot that flies in a straight line at constant speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bolt {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Velocity in px/s
    pub vel: Vec2,
    /// Contact radius
    pub radius: f32,
    alive: bool,
}

impl Bolt {
    /// Default bolt speed, 8 px per tick at 60 Hz
    pub const DEFAULT_SPEED: f32 = 480.0;
    /// Default contact radius
    pub const DEFAULT_RADIUS: f32 = 20.0;

    /// Fire from `origin` toward `target`
    ///
    /// With nowhere to aim (target on top of origin) the bolt falls straight down.
    pub fn aimed(id: u32, origin: Vec2, target: Vec2, speed: f32, radius: f32) -> Self {
        let dir = (target - origin).try_normalize().unwrap_or(Vec2::NEG_Y);
        Self {
            id,
            pos: origin,
            vel: dir * speed,
            radius,
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

    /// Move one tick; retire once the center is `margin` outside `bounds`.
    /// Returns whether the bolt is still alive.
    pub fn update(&mut self, dt: f32, bounds: &Rect, margin: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.pos += self.vel * dt;
        if !bounds.expand(margin).contains_point(self.pos) {
            log::trace!("bolt {} left the field at {:?}", self.id, self.pos);
            self.alive = false;
        }
        self.alive
    }
}
