//! Waypoint patrol state machine
//!
//! A patrol agent walks a cyclic path of level waypoints. The path holds
//! indices into the level's waypoint table, so every agent on a level shares
//! the same waypoint data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::ARRIVAL_THRESHOLD;
use crate::heading_degrees;

/// Where an agent without a usable path parks
pub const FALLBACK_POSITION: Vec2 = Vec2::new(50.0, 50.0);

/// A named point on a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub pos: Vec2,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, pos: Vec2) -> Self {
        Self { id: id.into(), pos }
    }
}

/// Lifecycle of a patrol agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolState {
    /// Walking the path
    Traveling,
    /// Hit; frozen while the presentation layer fades it out
    Dead,
    /// Fade finished and the owner has dropped it
    Removed,
}

/// An enemy that patrols between waypoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolAgent {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Hit box size
    pub size: Vec2,
    /// Speed in px/s
    pub speed: f32,
    /// Facing in degrees, for presentation only
    pub heading: f32,
    /// Indices into the level's waypoint table, in patrol order
    path: Vec<usize>,
    /// Position in `path` of the waypoint being approached
    current: usize,
    state: PatrolState,
}

impl PatrolAgent {
    /// Create an agent standing on the first waypoint of `path`
    pub fn new(id: u32, path: Vec<usize>, waypoints: &[Waypoint], speed: f32, size: Vec2) -> Self {
        let pos = path
            .first()
            .and_then(|&i| waypoints.get(i))
            .map(|wp| wp.pos)
            .unwrap_or(FALLBACK_POSITION);
        Self {
            id,
            pos,
            size,
            speed,
            heading: 0.0,
            path,
            current: 0,
            state: PatrolState::Traveling,
        }
    }

    #[inline]
    pub fn state(&self) -> PatrolState {
        self.state
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state != PatrolState::Traveling
    }

    #[inline]
    pub fn removed(&self) -> bool {
        self.state == PatrolState::Removed
    }

    /// Index into `path` of the waypoint currently targeted
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Waypoint table index currently targeted, if the path is usable
    pub fn target_waypoint(&self) -> Option<usize> {
        self.path.get(self.current).copied()
    }

    /// Advance one tick along the path; returns false once the agent is dead
    ///
    /// Motion is scaled by `dt` and never overshoots the target waypoint.
    pub fn update(&mut self, dt: f32, waypoints: &[Waypoint]) -> bool {
        if self.state != PatrolState::Traveling {
            return false;
        }
        let Some(target) = self.target_waypoint().and_then(|i| waypoints.get(i)) else {
            return true;
        };

        let to_target = target.pos - self.pos;
        let dist = to_target.length();
        if dist < ARRIVAL_THRESHOLD {
            self.current = (self.current + 1) % self.path.len();
            log::trace!("patrol agent {} heading to path index {}", self.id, self.current);
            return true;
        }

        let dir = to_target / dist;
        let step = (self.speed * dt).min(dist);
        self.pos += dir * step;
        self.heading = heading_degrees(dir);
        true
    }

    /// Destroy request: Traveling -> Dead. Returns false if already dead.
    pub fn destroy(&mut self) -> bool {
        if self.state != PatrolState::Traveling {
            return false;
        }
        self.state = PatrolState::Dead;
        log::debug!("patrol agent {} destroyed at {:?}", self.id, self.pos);
        true
    }

    /// Fade finished: Dead -> Removed. Has no effect on a living agent.
    pub fn mark_removed(&mut self) {
        if self.state == PatrolState::Dead {
            self.state = PatrolState::Removed;
        }
    }

    /// Hit box centered on the agent
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}
