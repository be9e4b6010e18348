//! Collision resolution against static wall rectangles
//!
//! Motion is applied one axis at a time. When the tentative position on an
//! axis overlaps a wall, the box is walked back one unit at a time against
//! its direction of travel until it is clear, and that axis's velocity is
//! zeroed. X is settled first and the corrected X is used for the Y test, so
//! a body can slide along a wall on one axis while stopping on the other.

use glam::Vec2;

use super::geometry::{Rect, intersects_any};
use crate::consts::{MAX_CORRECTION_STEPS, VELOCITY_EPSILON};

/// Result of resolving one step of motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Corrected minimum corner of the moving box
    pub pos: Vec2,
    /// Velocity after resolution (blocked axes are zero)
    pub vel: Vec2,
    /// A wall stopped motion on X
    pub hit_x: bool,
    /// A wall stopped motion on Y
    pub hit_y: bool,
}

impl CollisionResult {
    #[inline]
    pub fn collided(&self) -> bool {
        self.hit_x || self.hit_y
    }
}

/// Move `body` by `vel * dt`, correcting penetration into `walls`
///
/// If the correction cap is reached while still overlapping, the last
/// position is accepted and a small residual overlap may remain.
pub fn resolve(body: &Rect, vel: Vec2, dt: f32, walls: &[Rect]) -> CollisionResult {
    let mut result = CollisionResult {
        pos: body.min(),
        vel,
        hit_x: false,
        hit_y: false,
    };

    // X axis
    let target_x = body.x + vel.x * dt;
    let blocked_x = |x: f32| intersects_any(&body.at(Vec2::new(x, body.y)), walls);
    if blocked_x(target_x) {
        result.pos.x = settle_axis(body.x, target_x, vel.x, blocked_x);
        result.vel.x = 0.0;
        result.hit_x = true;
    } else {
        result.pos.x = target_x;
    }

    // Y axis, tested at the corrected X
    let x = result.pos.x;
    let target_y = body.y + vel.y * dt;
    let blocked_y = |y: f32| intersects_any(&body.at(Vec2::new(x, y)), walls);
    if blocked_y(target_y) {
        result.pos.y = settle_axis(body.y, target_y, vel.y, blocked_y);
        result.vel.y = 0.0;
        result.hit_y = true;
    } else {
        result.pos.y = target_y;
    }

    result
}

/// Walk `target` back toward free space one unit at a time
///
/// An axis with (near) zero velocity cannot have caused the overlap, so its
/// move is undone instead of walked.
fn settle_axis(start: f32, target: f32, v: f32, blocked: impl Fn(f32) -> bool) -> f32 {
    if v.abs() < VELOCITY_EPSILON {
        return start;
    }

    let step = -v.signum();
    let mut pos = target;
    let mut iterations = 0;
    while iterations < MAX_CORRECTION_STEPS && blocked(pos) {
        pos += step;
        iterations += 1;
    }

    if iterations == MAX_CORRECTION_STEPS && blocked(pos) {
        log::warn!(
            "collision correction capped at {} steps (start {}, settled {})",
            MAX_CORRECTION_STEPS,
            start,
            pos
        );
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_stops_against_wall_on_x() {
        let wall = Rect::new(100.0, 100.0, 50.0, 50.0);
        let body = Rect::new(80.0, 100.0, 20.0, 20.0);

        let result = resolve(&body, Vec2::new(10.0, 0.0), 1.0, &[wall]);

        assert!(result.collided());
        assert!(result.hit_x);
        assert!(!result.hit_y);
        assert_eq!(result.vel.x, 0.0);
        assert!(!body.at(result.pos).intersects(&wall));
    }

    #[test]
    fn test_free_motion_is_unchanged() {
        let body = Rect::new(0.0, 0.0, 10.0, 10.0);
        let wall = Rect::new(500.0, 500.0, 10.0, 10.0);

        let result = resolve(&body, Vec2::new(30.0, -60.0), 0.5, &[wall]);

        assert!(!result.collided());
        assert_eq!(result.pos, Vec2::new(15.0, -30.0));
        assert_eq!(result.vel, Vec2::new(30.0, -60.0));
    }

    #[test]
    fn test_landing_on_floor_zeroes_only_vy() {
        let floor = Rect::new(0.0, 0.0, 500.0, 20.0);
        let body = Rect::new(100.0, 25.0, 10.0, 10.0);

        let result = resolve(&body, Vec2::new(40.0, -600.0), 1.0 / 60.0, &[floor]);

        assert!(result.hit_y);
        assert!(!result.hit_x);
        assert_eq!(result.vel.y, 0.0);
        assert!((result.vel.x - 40.0).abs() < 1e-6);
        assert!(result.pos.y >= floor.top() - 1e-3);
        assert!(!body.at(result.pos).intersects(&floor));
    }

    #[test]
    fn test_corner_stops_both_axes() {
        // Wall occupies the quadrant up and to the right of the body
        let wall = Rect::new(20.0, 0.0, 100.0, 100.0);
        let ceiling = Rect::new(0.0, 20.0, 20.0, 100.0);
        let body = Rect::new(5.0, 5.0, 10.0, 10.0);

        let result = resolve(&body, Vec2::new(10.0, 10.0), 1.0, &[wall, ceiling]);

        assert!(result.hit_x && result.hit_y);
        assert_eq!(result.vel, Vec2::ZERO);
        let settled = body.at(result.pos);
        assert!(!settled.intersects(&wall));
        assert!(!settled.intersects(&ceiling));
    }

    #[test]
    fn test_zero_velocity_axis_does_not_drift() {
        // Body already overlapping a wall with no horizontal motion
        let wall = Rect::new(0.0, 0.0, 100.0, 100.0);
        let body = Rect::new(50.0, 50.0, 10.0, 10.0);

        let result = resolve(&body, Vec2::ZERO, 1.0, &[wall]);

        assert_eq!(result.pos, Vec2::new(50.0, 50.0));
        assert!(result.hit_x);
    }

    #[test]
    fn test_deep_penetration_accepts_capped_position() {
        // Tunnels 80 units into a thick wall; only 50 unit steps are allowed
        let wall = Rect::new(100.0, 0.0, 400.0, 100.0);
        let body = Rect::new(70.0, 10.0, 10.0, 10.0);

        let result = resolve(&body, Vec2::new(110.0, 0.0), 1.0, &[wall]);

        assert!(result.hit_x);
        assert_eq!(result.vel.x, 0.0);
        assert!((result.pos.x - 130.0).abs() < 1e-3);
    }
}
