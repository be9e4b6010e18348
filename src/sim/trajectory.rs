//! Launch input and the dotted trajectory preview
//!
//! The preview takes gravity as a parameter; scenes pass the same
//! [`crate::settings::Tuning::gravity`] they give to projectiles.

use glam::Vec2;

use crate::limit;

/// Number of preview dots
pub const DOT_COUNT: usize = 30;
/// Seconds between consecutive dots
pub const DOT_SPACING: f32 = 0.2;

/// Predicted positions at `spacing`, `2 * spacing`, ... seconds after launch
///
/// Walls are ignored; this is the free-flight parabola.
pub fn trajectory_points(
    start: Vec2,
    velocity: Vec2,
    gravity: f32,
    count: usize,
    spacing: f32,
) -> Vec<Vec2> {
    (1..=count)
        .map(|i| {
            let t = i as f32 * spacing;
            start + velocity * t + Vec2::new(0.0, 0.5 * gravity * t * t)
        })
        .collect()
}

/// Launch velocity for a drag from `start` to `current`
///
/// The slingshot fires opposite the drag; drags longer than `max_drag`
/// add no extra power.
pub fn launch_velocity(start: Vec2, current: Vec2, max_drag: f32, power: f32) -> Vec2 {
    limit(start - current, max_drag) * power
}

/// Tracks one drag gesture on the slingshot
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    start: Option<Vec2>,
    current: Vec2,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    pub fn begin(&mut self, start: Vec2) {
        self.start = Some(start);
        self.current = start;
    }

    pub fn update(&mut self, current: Vec2) {
        if self.start.is_some() {
            self.current = current;
        }
    }

    /// Velocity the projectile would leave with if released now
    pub fn pending_velocity(&self, max_drag: f32, power: f32) -> Option<Vec2> {
        self.start
            .map(|start| launch_velocity(start, self.current, max_drag, power))
    }

    /// Finish the drag; `None` if no drag was in progress
    pub fn release(&mut self, max_drag: f32, power: f32) -> Option<Vec2> {
        let velocity = self.pending_velocity(max_drag, power);
        *self = Self::default();
        velocity
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}
