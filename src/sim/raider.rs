//! Survival-mode enemies and their weapons
//!
//! A raider's motion is fixed when it is spawned. Firing is a separate
//! capability: raiders that shoot carry a boxed [`Shooter`], the rest carry
//! nothing.

use std::fmt::Debug;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bolt::Bolt;
use super::flocking::{FLOCK_CULL_MARGIN, FlockAgent};
use super::geometry::Rect;
use super::homing::HomingAgent;

/// Something a raider can fire with
pub trait Shooter: Debug {
    /// Advance the weapon by `dt`; returns a bolt when one is fired this tick.
    ///
    /// The returned bolt's id is a placeholder for the owner to assign.
    fn fire(&mut self, dt: f32, origin: Vec2, target: Vec2) -> Option<Bolt>;
}

/// Fires an aimed bolt every `cooldown` seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blaster {
    pub cooldown: f32,
    pub bolt_speed: f32,
    pub bolt_radius: f32,
    /// Seconds until the next shot
    timer: f32,
}

impl Blaster {
    pub fn new(cooldown: f32, bolt_speed: f32, bolt_radius: f32) -> Self {
        Self {
            cooldown,
            bolt_speed,
            bolt_radius,
            timer: cooldown,
        }
    }
}

impl Shooter for Blaster {
    fn fire(&mut self, dt: f32, origin: Vec2, target: Vec2) -> Option<Bolt> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        self.timer += self.cooldown.max(dt);
        Some(Bolt::aimed(0, origin, target, self.bolt_speed, self.bolt_radius))
    }
}

/// The kinds of motion a raider can be spawned with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaiderKind {
    Falling,
    Homing,
    Flocking,
}

#[derive(Debug, Clone)]
pub enum RaiderMotion {
    /// Straight down at a constant speed (px/s)
    Falling { pos: Vec2, speed: f32 },
    /// Chases the player until its lifetime runs out
    Homing(HomingAgent),
    /// Moves with the other flocking raiders
    Flocking(FlockAgent),
}

/// A survival-mode enemy
#[derive(Debug)]
pub struct Raider {
    pub id: u32,
    /// Side length of the sprite box; contact uses a fraction of it
    pub size: f32,
    pub motion: RaiderMotion,
    weapon: Option<Box<dyn Shooter>>,
    alive: bool,
}

impl Raider {
    /// Multiplier applied to the base speed of falling raiders
    pub const FALL_SPEED_FACTOR: f32 = 1.5;

    pub fn new(id: u32, size: f32, motion: RaiderMotion, weapon: Option<Box<dyn Shooter>>) -> Self {
        Self {
            id,
            size,
            motion,
            weapon,
            alive: true,
        }
    }

    /// A raider that drops straight down at 1.5x `speed`
    pub fn falling(id: u32, pos: Vec2, speed: f32, size: f32) -> Self {
        Self::new(
            id,
            size,
            RaiderMotion::Falling {
                pos,
                speed: speed * Self::FALL_SPEED_FACTOR,
            },
            None,
        )
    }

    pub fn homing(id: u32, pos: Vec2, speed: f32, size: f32) -> Self {
        Self::new(
            id,
            size,
            RaiderMotion::Homing(HomingAgent::new(pos, speed, HomingAgent::DEFAULT_LIFETIME)),
            None,
        )
    }

    /// A flocking raider entering with a downward velocity and seeking the player
    pub fn flocking(id: u32, pos: Vec2, speed: f32, size: f32) -> Self {
        let mut agent = FlockAgent::new(id, pos, Vec2::new(0.0, -speed));
        agent.seek_target = true;
        Self::new(id, size, RaiderMotion::Flocking(agent), None)
    }

    pub fn with_weapon(mut self, weapon: Box<dyn Shooter>) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn kind(&self) -> RaiderKind {
        match self.motion {
            RaiderMotion::Falling { .. } => RaiderKind::Falling,
            RaiderMotion::Homing(_) => RaiderKind::Homing,
            RaiderMotion::Flocking(_) => RaiderKind::Flocking,
        }
    }

    pub fn pos(&self) -> Vec2 {
        match &self.motion {
            RaiderMotion::Falling { pos, .. } => *pos,
            RaiderMotion::Homing(agent) => agent.pos,
            RaiderMotion::Flocking(agent) => agent.pos(),
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn has_weapon(&self) -> bool {
        self.weapon.is_some()
    }

    pub fn flock_agent(&self) -> Option<&FlockAgent> {
        match &self.motion {
            RaiderMotion::Flocking(agent) => Some(agent),
            _ => None,
        }
    }

    /// Move one tick. `force` is the flock steering force and only applies to
    /// flocking raiders. Returns whether the raider is still alive.
    pub fn update(
        &mut self,
        dt: f32,
        player: Vec2,
        force: Vec2,
        bounds: &Rect,
        margin: f32,
    ) -> bool {
        if !self.alive {
            return false;
        }
        let half = self.size / 2.0;
        self.alive = match &mut self.motion {
            RaiderMotion::Falling { pos, speed } => {
                pos.y -= *speed * dt;
                pos.y - half >= bounds.y - margin
            }
            RaiderMotion::Homing(agent) => agent.update(dt, player),
            RaiderMotion::Flocking(agent) => agent.update(dt, force, bounds, FLOCK_CULL_MARGIN),
        };
        if !self.alive {
            log::debug!("raider {} retired ({:?})", self.id, self.kind());
        }
        self.alive
    }

    /// Let the weapon, if any, fire at `target`
    pub fn fire(&mut self, dt: f32, target: Vec2) -> Option<Bolt> {
        if !self.alive {
            return None;
        }
        let origin = self.pos();
        self.weapon.as_mut()?.fire(dt, origin, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Rect {
        Rect::new(0.0, 0.0, 540.0, 960.0)
    }

    #[test]
    fn test_blaster_respects_cooldown() {
        let mut blaster = Blaster::new(0.5, 480.0, 20.0);
        let shots: Vec<bool> = (0..12)
            .map(|_| blaster.fire(0.125, Vec2::ZERO, Vec2::X).is_some())
            .collect();
        assert_eq!(shots.iter().filter(|&&s| s).count(), 3);
        assert!(!shots[0]);
        assert!(shots[3] && shots[7] && shots[11]);
    }

    #[test]
    fn test_falling_raider_descends_faster() {
        let mut raider = Raider::falling(1, Vec2::new(100.0, 500.0), 240.0, 120.0);
        raider.update(0.5, Vec2::ZERO, Vec2::ZERO, &field(), 50.0);
        assert!((raider.pos().y - 320.0).abs() < 1e-3);
    }

    #[test]
    fn test_falling_raider_retired_below_field() {
        let mut raider = Raider::falling(1, Vec2::new(100.0, 20.0), 240.0, 120.0);
        assert!(!raider.update(0.5, Vec2::ZERO, Vec2::ZERO, &field(), 50.0));
        assert!(!raider.alive());
    }

    #[test]
    fn test_homing_raider_chases_player() {
        let mut raider = Raider::homing(1, Vec2::new(0.0, 0.0), 240.0, 120.0);
        raider.update(0.25, Vec2::new(0.0, 300.0), Vec2::ZERO, &field(), 50.0);
        assert!((raider.pos() - Vec2::new(0.0, 60.0)).length() < 1e-3);
        assert_eq!(raider.kind(), RaiderKind::Homing);
    }

    #[test]
    fn test_only_armed_raiders_fire() {
        let mut unarmed = Raider::falling(1, Vec2::new(100.0, 500.0), 240.0, 120.0);
        assert!(unarmed.fire(10.0, Vec2::ZERO).is_none());

        let mut armed = Raider::falling(2, Vec2::new(100.0, 500.0), 240.0, 120.0)
            .with_weapon(Box::new(Blaster::new(1.0, 480.0, 20.0)));
        let bolt = armed.fire(1.0, Vec2::new(100.0, 0.0)).expect("cooldown elapsed");
        assert_eq!(bolt.pos, Vec2::new(100.0, 500.0));
        assert_eq!(bolt.vel, Vec2::new(0.0, -480.0));
    }

    #[test]
    fn test_flocking_raider_exposes_agent() {
        let raider = Raider::flocking(7, Vec2::new(200.0, 900.0), 240.0, 120.0);
        let agent = raider.flock_agent().expect("flocking");
        assert_eq!(agent.id, 7);
        assert!(agent.seek_target);
    }
}
