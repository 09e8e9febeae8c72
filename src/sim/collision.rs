//! Collision resolution against the tile grid
//!
//! Bodies are axis-aligned boxes given as offsets from a position, and are
//! assumed smaller than one cell. Movement is resolved one axis at a time:
//! a grid check only happens when the moving edge enters a new cell, and then
//! only the two cells under the corners of that edge are probed.
//!
//! Callers move X before Y. Approaching a corner diagonally can therefore
//! catch on it where a true swept test would slide past.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use crate::cell_of;
use crate::consts::*;

/// Box offsets relative to an entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vec2::new(-CELL * 0.25, -CELL * 0.25),
            max: Vec2::new(CELL * 0.25, CELL * 0.5 - 1.0),
        }
    }
}

impl BoundingBox {
    /// Grow horizontally by `amount` on both sides
    pub fn widened(self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::new(amount, 0.0),
            max: self.max + Vec2::new(amount, 0.0),
        }
    }

    /// Center of the box for an entity at `pos`
    #[inline]
    pub fn center(&self, pos: Vec2) -> Vec2 {
        pos + (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Center/half-extent overlap test between two placed boxes
    pub fn overlaps(&self, pos: Vec2, other: &BoundingBox, other_pos: Vec2) -> bool {
        let d = (self.center(pos) - other.center(other_pos)).abs();
        let reach = self.half_extents() + other.half_extents();
        d.x < reach.x && d.y < reach.y
    }

    /// Inclusive cell range `(min, max)` covered by the box, clamped to the grid
    pub fn touched_cells(&self, pos: Vec2, grid: &TileGrid) -> ((i32, i32), (i32, i32)) {
        let max_x = grid.width().saturating_sub(1) as i32;
        let max_y = grid.height().saturating_sub(1) as i32;
        let lo = pos + self.min;
        let hi = pos + self.max;
        (
            (cell_of(lo.x).clamp(0, max_x), cell_of(lo.y).clamp(0, max_y)),
            (cell_of(hi.x).clamp(0, max_x), cell_of(hi.y).clamp(0, max_y)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of a single-axis move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMove {
    /// Position after the move
    pub pos: Vec2,
    /// Velocity on the moved axis (zeroed when blocked)
    pub velocity: f32,
    /// Whether a solid cell stopped the move
    pub blocked: bool,
}

/// Move a box by `delta` along one axis, stopping short of solid cells
pub fn move_axis(
    grid: &TileGrid,
    pos: Vec2,
    bbox: &BoundingBox,
    velocity: f32,
    axis: Axis,
    delta: f32,
) -> AxisMove {
    let unmoved = AxisMove {
        pos,
        velocity,
        blocked: false,
    };
    if delta == 0.0 {
        return unmoved;
    }

    // Split into (moving-axis, cross-axis) components
    let (along, lo, hi) = match axis {
        Axis::X => (pos.x, bbox.min.x, bbox.max.x),
        Axis::Y => (pos.y, bbox.min.y, bbox.max.y),
    };
    let (cross_lo, cross_hi) = match axis {
        Axis::X => (pos.y + bbox.min.y, pos.y + bbox.max.y),
        Axis::Y => (pos.x + bbox.min.x, pos.x + bbox.max.x),
    };

    let edge = along + if delta > 0.0 { hi } else { lo };
    let target = edge + delta;
    let target_cell = cell_of(target);

    let solid = |c: i32| match axis {
        Axis::X => grid.is_solid(target_cell, c),
        Axis::Y => grid.is_solid(c, target_cell),
    };
    let blocked = cell_of(edge) != target_cell
        && (solid(cell_of(cross_lo)) || solid(cell_of(cross_hi)));

    if !blocked {
        return AxisMove {
            pos: with_axis(pos, axis, along + delta),
            ..unmoved
        };
    }

    // placed from the contact line directly so a resting edge is exact
    let resting = if delta > 0.0 {
        target_cell as f32 * CELL - CONTACT_EPSILON - hi
    } else {
        (target_cell + 1) as f32 * CELL + CONTACT_EPSILON - lo
    };
    AxisMove {
        pos: with_axis(pos, axis, resting),
        velocity: 0.0,
        blocked: true,
    }
}

#[inline]
fn with_axis(mut pos: Vec2, axis: Axis, value: f32) -> Vec2 {
    match axis {
        Axis::X => pos.x = value,
        Axis::Y => pos.y = value,
    }
    pos
}

/// Whether the box stands on solid ground: not rising, and a solid cell
/// starts within one unit below either bottom corner.
pub fn is_grounded(grid: &TileGrid, pos: Vec2, bbox: &BoundingBox, vy: f32) -> bool {
    if vy < 0.0 {
        return false;
    }
    let feet = pos.y + bbox.max.y;
    let probe = feet + GROUND_PROBE;
    if cell_of(feet) == cell_of(probe) {
        return false;
    }
    let row = cell_of(probe);
    grid.is_solid(cell_of(pos.x + bbox.min.x), row) || grid.is_solid(cell_of(pos.x + bbox.max.x), row)
}
