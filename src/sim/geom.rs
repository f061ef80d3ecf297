//! Circle vs axis-aligned rectangle collision
//!
//! The single collision primitive behind every brick and paddle hit. The
//! field is canvas-oriented: x grows right, y grows down, rectangles are
//! stored by their top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Which velocity component a resolved hit reflects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAxis {
    /// Struck a vertical face: reflect dx
    X,
    /// Struck a horizontal face: reflect dy
    Y,
    /// Struck a corner: reflect both components
    Corner,
}

/// A resolved circle/rect collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub axis: HitAxis,
    pub penetration: f32,
}

/// Check whether a circle overlaps a rectangle
pub fn intersects(center: Vec2, radius: f32, rect: &Rect) -> bool {
    resolve_circle_rect(center, radius, rect).is_some()
}

/// Resolve a circle/rect collision into a face or corner hit.
///
/// Two-phase test: if the circle center lies within the rectangle's
/// half-extent on one axis the contact is a face on the other axis;
/// otherwise the nearest corner decides. `delta == half_extent` exactly
/// resolves as a face hit, never a corner.
pub fn resolve_circle_rect(center: Vec2, radius: f32, rect: &Rect) -> Option<Hit> {
    let delta = (center - rect.center()).abs();
    let half = rect.half_extents();

    // Separated on either axis: no collision possible
    if delta.x > half.x + radius || delta.y > half.y + radius {
        return None;
    }

    let within_x = delta.x <= half.x;
    let within_y = delta.y <= half.y;

    if within_x || within_y {
        let pen_x = half.x + radius - delta.x;
        let pen_y = half.y + radius - delta.y;
        // Within both half-extents (center overlapping the rect): resolve
        // along the axis of least penetration
        let axis = if within_x && within_y {
            if pen_y <= pen_x { HitAxis::Y } else { HitAxis::X }
        } else if within_x {
            HitAxis::Y
        } else {
            HitAxis::X
        };
        let penetration = match axis {
            HitAxis::X => pen_x,
            HitAxis::Y => pen_y,
            HitAxis::Corner => unreachable!(),
        };
        return Some(Hit { axis, penetration });
    }

    // Outside both half-extents: corner test against the nearest corner
    let gap = delta - half;
    let dist_sq = gap.length_squared();
    if dist_sq <= radius * radius {
        return Some(Hit {
            axis: HitAxis::Corner,
            penetration: radius - dist_sq.sqrt(),
        });
    }

    None
}
