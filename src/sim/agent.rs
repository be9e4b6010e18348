//! Point-mass agent shared by the steering behaviors

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::STEERING_GAIN;
use crate::limit;

/// Position, velocity and a per-tick force accumulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub pos: Vec2,
    /// Velocity in px/s
    pub vel: Vec2,
    /// Steering accumulated this tick; cleared by [`Agent::integrate`]
    pub acc: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    alive: bool,
}

impl Agent {
    pub fn new(pos: Vec2, vel: Vec2, max_speed: f32, max_force: f32) -> Self {
        Self {
            pos,
            vel,
            acc: Vec2::ZERO,
            max_speed,
            max_force,
            alive: true,
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.alive
    }

    /// Once dead, always dead
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Add a steering force, clamped to `max_force`
    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += limit(force, self.max_force);
    }

    /// Fold the accumulated force into velocity and position, then reset it
    pub fn integrate(&mut self, dt: f32) {
        if !self.alive {
            self.acc = Vec2::ZERO;
            return;
        }
        self.vel = limit(self.vel + self.acc * STEERING_GAIN * dt, self.max_speed);
        self.pos += self.vel * dt;
        self.acc = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_is_clamped() {
        let mut a = Agent::new(Vec2::ZERO, Vec2::ZERO, 100.0, 0.5);
        a.apply_force(Vec2::new(10.0, 0.0));
        assert!((a.acc.length() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_resets_accumulator_and_caps_speed() {
        let mut a = Agent::new(Vec2::ZERO, Vec2::new(90.0, 0.0), 100.0, 1.0);
        a.apply_force(Vec2::new(1.0, 0.0));
        a.integrate(1.0 / 60.0);
        assert_eq!(a.acc, Vec2::ZERO);
        assert!((a.vel.length() - 100.0).abs() < 1e-3);
        assert!(a.pos.x > 0.0);
    }

    #[test]
    fn test_dead_agent_does_not_move() {
        let mut a = Agent::new(Vec2::ZERO, Vec2::new(50.0, 0.0), 100.0, 1.0);
        a.kill();
        a.apply_force(Vec2::X);
        a.integrate(1.0);
        assert_eq!(a.pos, Vec2::ZERO);
        assert_eq!(a.acc, Vec2::ZERO);
        assert!(!a.alive());
    }
}
