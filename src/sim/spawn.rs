//! Raider spawn policy
//!
//! All randomness comes from the generator passed in, so a scene seeded with
//! the same value spawns the same raiders in the same places.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::raider::RaiderKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPolicy {
    /// Seconds between spawns
    pub interval: f32,
    /// Chance a new raider homes on the player
    pub homing_chance: f32,
    /// Homing raiders allowed at once
    pub max_homing: usize,
    /// Chance a non-homing raider joins the flock
    pub flocking_chance: f32,
    /// Two raiders overlap when closer than this many half-sizes
    pub overlap_factor: f32,
    /// Re-placement attempts before an overlapping raider is accepted anyway
    pub placement_attempts: u32,
    /// Closest a spawn may be to either side of the field
    pub edge_margin: f32,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            interval: 2.0,
            homing_chance: 0.3,
            max_homing: 5,
            flocking_chance: 0.2,
            overlap_factor: 1.5,
            placement_attempts: 10,
            edge_margin: 50.0,
        }
    }
}

impl SpawnPolicy {
    /// Pick the motion for the next raider
    pub fn choose_kind<R: Rng>(&self, rng: &mut R, homing_count: usize) -> RaiderKind {
        if homing_count < self.max_homing && rng.random::<f32>() < self.homing_chance {
            RaiderKind::Homing
        } else if rng.random::<f32>() < self.flocking_chance {
            RaiderKind::Flocking
        } else {
            RaiderKind::Falling
        }
    }

    /// Random x inside the field, `edge_margin` away from both sides
    pub fn spawn_x<R: Rng>(&self, rng: &mut R, width: f32) -> f32 {
        let lo = self.edge_margin;
        let hi = width - self.edge_margin;
        if hi <= lo {
            return width / 2.0;
        }
        rng.random_range(lo..=hi)
    }

    /// Whether a raider of `size` at `a` overlaps one at `b`
    pub fn overlaps(&self, a: Vec2, b: Vec2, size: f32) -> bool {
        a.distance(b) < size / 2.0 * self.overlap_factor
    }

    /// Choose a spawn position at height `y`, re-rolling x while it overlaps
    /// any of `occupied`. After `placement_attempts` re-rolls the last
    /// position is accepted even if it still overlaps.
    pub fn place<R: Rng>(
        &self,
        rng: &mut R,
        width: f32,
        y: f32,
        size: f32,
        occupied: &[Vec2],
    ) -> Vec2 {
        let mut pos = Vec2::new(self.spawn_x(rng, width), y);
        let mut attempts = 0;
        while attempts < self.placement_attempts
            && occupied.iter().any(|&other| self.overlaps(pos, other, size))
        {
            pos.x = self.spawn_x(rng, width);
            attempts += 1;
        }
        if attempts == self.placement_attempts
            && occupied.iter().any(|&o| self.overlaps(pos, o, size))
        {
            log::debug!("spawn at {:?} still overlaps after {} attempts", pos, attempts);
        }
        pos
    }
}
