//! Axis-aligned rectangle and segment primitives
//!
//! A rectangle is anchored at its minimum corner `(x, y)` and extends by
//! `(w, h)` toward +X/+Y. Walls are built once per level and only ever read.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (AABB)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Same size, moved so its minimum corner sits at `min`
    #[inline]
    pub fn at(&self, min: Vec2) -> Self {
        Self::new(min.x, min.y, self.w, self.h)
    }

    /// Open-interval overlap test: rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.top() <= other.y
            || other.top() <= self.y)
    }

    /// Closed-interval containment (points on the border are inside)
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.top()
    }

    /// Grow by `pad` on every side
    pub fn expand(&self, pad: f32) -> Self {
        Self::new(self.x - pad, self.y - pad, self.w + 2.0 * pad, self.h + 2.0 * pad)
    }

    /// The four edges, counter-clockwise from the bottom edge
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let bl = Vec2::new(self.x, self.y);
        let br = Vec2::new(self.right(), self.y);
        let tr = Vec2::new(self.right(), self.top());
        let tl = Vec2::new(self.x, self.top());
        [(bl, br), (br, tr), (tr, tl), (tl, bl)]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

impl From<(f32, f32, f32, f32)> for Rect {
    fn from((x, y, w, h): (f32, f32, f32, f32)) -> Self {
        Self::new(x, y, w, h)
    }
}

/// True if any rectangle in `walls` overlaps `rect`
#[inline]
pub fn intersects_any(rect: &Rect, walls: &[Rect]) -> bool {
    walls.iter().any(|w| rect.intersects(w))
}

#[inline]
fn ccw(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Proper segment intersection; collinear overlaps are not reported
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    ccw(p1, p3, p4) != ccw(p2, p3, p4) && ccw(p1, p2, p3) != ccw(p1, p2, p4)
}

/// True if the segment `p1..p2` touches or crosses `rect`
pub fn segment_intersects_rect(p1: Vec2, p2: Vec2, rect: &Rect) -> bool {
    // Either endpoint inside is the common case
    if rect.contains_point(p1) || rect.contains_point(p2) {
        return true;
    }
    rect.edges()
        .iter()
        .any(|&(a, b)| segments_intersect(p1, p2, a, b))
}
