//! Ballistic projectile body
//!
//! Integrates gravity, hands positional correction to the collision resolver,
//! and decides between bursting on impact and bouncing with restitution.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve;
use super::geometry::Rect;
use crate::consts::BOUNCE_ENERGY_THRESHOLD;
use crate::settings::Tuning;

/// A gravity-driven projectile (the slingshot egg)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Minimum corner of the bounding box
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Vertical acceleration (negative pulls down)
    pub gravity: f32,
    pub bounce_enabled: bool,
    /// Fraction of speed kept on a bounce (0..=1)
    pub restitution: f32,
    /// Seconds since launch
    pub life: f32,
    /// Energy right after the previous bounce
    last_bounce_energy: Option<f32>,
    alive: bool,
}

impl Projectile {
    pub fn new(id: u32, center: Vec2, size: Vec2, vel: Vec2, gravity: f32) -> Self {
        Self {
            id,
            pos: center - size / 2.0,
            size,
            vel,
            gravity,
            bounce_enabled: false,
            restitution: 0.5,
            life: 0.0,
            last_bounce_energy: None,
            alive: true,
        }
    }

    /// Launch from `center` with the projectile settings in `tuning`
    pub fn launch(id: u32, center: Vec2, vel: Vec2, tuning: &Tuning) -> Self {
        let mut projectile = Self::new(
            id,
            center,
            Vec2::splat(tuning.projectile_size),
            vel,
            tuning.gravity,
        );
        projectile.bounce_enabled = tuning.bounce_enabled;
        projectile.restitution = tuning.restitution.clamp(0.0, 1.0);
        projectile
    }

    #[inline]
    pub fn alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Squared speed, the energy measure used for the bounce cutoff
    #[inline]
    pub fn energy(&self) -> f32 {
        self.vel.length_squared()
    }

    /// Retire the projectile; later calls have no effect
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Advance one tick against `walls`
    ///
    /// Returns the impact point when this tick ended the projectile's flight
    /// against a wall. `on_impact` receives the same point, at most once over
    /// the projectile's life.
    pub fn update_with_walls(
        &mut self,
        dt: f32,
        walls: &[Rect],
        on_impact: Option<&mut dyn FnMut(Vec2)>,
    ) -> Option<Vec2> {
        if !self.alive {
            return None;
        }

        self.life += dt;
        self.vel.y += self.gravity * dt;
        let incoming = self.vel;

        let result = resolve(&self.rect(), incoming, dt, walls);
        self.pos = result.pos;

        if !result.collided() {
            self.vel = result.vel;
            return None;
        }

        if !self.bounce_enabled {
            self.vel = result.vel;
            return Some(self.burst(on_impact, "impact"));
        }

        let mut vel = result.vel;
        if result.hit_x {
            vel.x = -incoming.x * self.restitution;
        }
        if result.hit_y {
            vel.y = -incoming.y * self.restitution;
        }
        self.vel = vel;
        log::trace!(
            "projectile {} bounced at {:?}, velocity {:?}",
            self.id,
            self.center(),
            self.vel
        );

        // Unit-step correction can lift a resting body by up to a pixel, so
        // a bounce that fails to shed energy also ends the flight
        let energy = self.energy();
        let settled = self.last_bounce_energy.is_some_and(|last| energy >= last);
        if energy < BOUNCE_ENERGY_THRESHOLD || settled {
            return Some(self.burst(on_impact, "spent"));
        }
        self.last_bounce_energy = Some(energy);
        None
    }

    fn burst(&mut self, on_impact: Option<&mut dyn FnMut(Vec2)>, reason: &str) -> Vec2 {
        self.alive = false;
        let center = self.center();
        log::debug!("projectile {} {} at {:?}", self.id, reason, center);
        if let Some(callback) = on_impact {
            callback(center);
        }
        center
    }

    /// Retire the projectile once it outlives `ttl` or leaves the playfield
    ///
    /// The playfield's top edge is open: an arc may leave upward and come
    /// back. Returns whether the projectile is still alive.
    pub fn cull(&mut self, ttl: f32, bounds: &Rect, margin: f32) -> bool {
        if !self.alive {
            return false;
        }
        let rect = self.rect();
        let expired = self.life > ttl;
        let out_of_bounds = rect.top() < bounds.y - margin
            || rect.right() < bounds.x - margin
            || rect.x > bounds.right() + margin;
        if expired || out_of_bounds {
            log::debug!(
                "projectile {} retired ({})",
                self.id,
                if expired { "expired" } else { "out of bounds" }
            );
            self.alive = false;
        }
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 20.0)
    }

    /// A 10x10 projectile centred at `center`
    fn body(center: Vec2, vel: Vec2, gravity: f32) -> Projectile {
        Projectile::new(1, center, Vec2::splat(10.0), vel, gravity)
    }

    #[test]
    fn test_gravity_integrates_into_velocity() {
        let mut p = body(Vec2::new(100.0, 500.0), Vec2::ZERO, -150.0);
        p.update_with_walls(0.1, &[], None);
        assert!((p.vel.y + 15.0).abs() < 1e-4);
        assert!(p.pos.y < 495.0);
        assert!(p.alive());
    }

    #[test]
    fn test_impact_without_bounce_kills_and_notifies_once() {
        let mut p = body(Vec2::new(100.0, 40.0), Vec2::new(0.0, -600.0), -980.0);
        let mut hits = Vec::new();
        for _ in 0..10 {
            let mut record = |c: Vec2| hits.push(c);
            p.update_with_walls(1.0 / 60.0, &[floor()], Some(&mut record));
        }
        assert!(!p.alive());
        assert_eq!(hits.len(), 1);
        assert!((hits[0] - p.center()).length() < 1e-4);
    }

    #[test]
    fn test_bounce_reflects_with_restitution() {
        let mut p = body(Vec2::new(100.0, 30.0), Vec2::new(0.0, -200.0), 0.0);
        p.bounce_enabled = true;
        p.restitution = 0.5;

        let impact = p.update_with_walls(1.0 / 10.0, &[floor()], None);

        assert!(impact.is_none());
        assert!(p.alive());
        assert!((p.vel.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_keeps_unblocked_axis() {
        let mut p = body(Vec2::new(100.0, 30.0), Vec2::new(80.0, -200.0), 0.0);
        p.bounce_enabled = true;
        p.restitution = 0.5;

        p.update_with_walls(0.1, &[floor()], None);

        assert!((p.vel.x - 80.0).abs() < 1e-4);
        assert!((p.vel.y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_weak_bounce_is_spent() {
        let mut p = body(Vec2::new(100.0, 26.0), Vec2::new(0.0, -8.0), 0.0);
        p.bounce_enabled = true;
        p.restitution = 0.5;
        let mut count = 0;
        let mut on_impact = |_: Vec2| count += 1;

        // Needs a full second to cover the 1 px gap at 8 px/s
        let impact = p.update_with_walls(1.0, &[floor()], Some(&mut on_impact));

        assert!(impact.is_some());
        assert!(!p.alive());
        assert_eq!(count, 1);
    }

    fn drop_until_spent(tuning: &Tuning, max_ticks: usize) -> (usize, usize, Projectile) {
        let mut p = Projectile::launch(1, Vec2::new(500.0, 519.0), Vec2::ZERO, tuning);
        let mut impacts = 0;
        let mut ticks = 0;
        while p.alive() && ticks < max_ticks {
            let mut count = |_: Vec2| impacts += 1;
            p.update_with_walls(1.0 / 60.0, &[floor()], Some(&mut count));
            ticks += 1;
        }
        (ticks, impacts, p)
    }

    #[test]
    fn test_repeated_bounces_end_flight() {
        let tuning = Tuning {
            bounce_enabled: true,
            ..Tuning::default()
        };
        let (ticks, impacts, p) = drop_until_spent(&tuning, 5000);
        assert!(!p.alive(), "still bouncing after {ticks} ticks");
        assert_eq!(impacts, 1);
        assert!(!p.rect().intersects(&floor()));

        // Same drop, same tick count
        let (again, _, _) = drop_until_spent(&tuning, 5000);
        assert_eq!(ticks, again);
    }

    #[test]
    fn test_resting_bounce_ends_under_strong_gravity() {
        // Each resting bounce reflects about 16 px/s * 0.6, above the energy cutoff
        let tuning = Tuning {
            bounce_enabled: true,
            gravity: -980.0,
            restitution: 0.6,
            ..Tuning::default()
        };
        let (ticks, impacts, p) = drop_until_spent(&tuning, 5000);
        assert!(!p.alive(), "still bouncing after {ticks} ticks");
        assert_eq!(impacts, 1);
    }

    #[test]
    fn test_elastic_bounce_that_keeps_energy_is_spent() {
        let wall = Rect::new(200.0, 0.0, 20.0, 1000.0);
        let mut p = body(Vec2::new(150.0, 500.0), Vec2::new(600.0, 0.0), 0.0);
        p.bounce_enabled = true;
        p.restitution = 1.0;
        let left = Rect::new(0.0, 0.0, 20.0, 1000.0);

        let mut bounces = 0;
        for _ in 0..600 {
            let before = p.vel.x;
            p.update_with_walls(1.0 / 60.0, &[wall, left], None);
            if p.alive() && p.vel.x.signum() != before.signum() {
                bounces += 1;
            }
            if !p.alive() {
                break;
            }
        }
        assert_eq!(bounces, 1);
        assert!(!p.alive());
    }

    #[test]
    fn test_dead_projectile_does_not_move() {
        let mut p = body(Vec2::new(100.0, 500.0), Vec2::new(50.0, 0.0), -150.0);
        p.kill();
        let before = p.pos;
        p.update_with_walls(1.0, &[], None);
        assert_eq!(p.pos, before);
        assert_eq!(p.life, 0.0);
    }

    #[test]
    fn test_cull_by_ttl_and_bounds() {
        let bounds = Rect::new(0.0, 0.0, 540.0, 960.0);

        let mut old = body(Vec2::new(100.0, 500.0), Vec2::ZERO, -150.0);
        old.life = 5.0;
        assert!(!old.cull(4.0, &bounds, 50.0));

        let mut fallen = body(Vec2::new(100.0, -100.0), Vec2::ZERO, -150.0);
        assert!(!fallen.cull(10.0, &bounds, 50.0));

        // Above the top edge is allowed
        let mut high = body(Vec2::new(100.0, 2000.0), Vec2::ZERO, -150.0);
        assert!(high.cull(10.0, &bounds, 50.0));
    }

    #[test]
    fn test_launch_copies_tuning() {
        let tuning = Tuning {
            bounce_enabled: true,
            restitution: 0.7,
            ..Tuning::default()
        };
        let p = Projectile::launch(9, Vec2::new(50.0, 50.0), Vec2::new(10.0, 10.0), &tuning);
        assert!(p.bounce_enabled);
        assert_eq!(p.restitution, 0.7);
        assert_eq!(p.gravity, tuning.gravity);
        assert_eq!(p.center(), Vec2::new(50.0, 50.0));
    }
}
