//! Shared character body and motion
//!
//! Every moving entity is a `Character`; the `behavior` tag picks which
//! state machine drives it. Gravity, ground detection and grid collision are
//! the same for all of them and live in `Character::step_motion`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::AnimTimer;
use super::collision::{Axis, BoundingBox, is_grounded, move_axis};
use super::grid::TileGrid;
use crate::consts::*;

/// Which state machine drives a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Player,
    Slime,
    Bat,
    Imp,
}

impl Behavior {
    /// Flying characters ignore gravity and never count as grounded
    pub fn flies(self) -> bool {
        self == Behavior::Bat
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub behavior: Behavior,
    pub pos: Vec2,
    pub vel: Vec2,
    pub bbox: BoundingBox,
    pub gravity: f32,
    pub grounded: bool,
    /// Set when horizontal motion was blocked; cleared by the owning behavior
    pub touched_wall: bool,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub anim: AnimTimer,
}

impl Character {
    pub fn new(behavior: Behavior, pos: Vec2, anim: AnimTimer) -> Self {
        let flies = behavior.flies();
        Self {
            behavior,
            pos,
            vel: Vec2::ZERO,
            bbox: BoundingBox::default(),
            gravity: if flies { 0.0 } else { GRAVITY },
            grounded: !flies,
            touched_wall: false,
            facing: 1.0,
            anim,
        }
    }

    /// Turn to face the sign of `dir` (zero keeps the current facing)
    pub fn face(&mut self, dir: f32) {
        if dir > 0.0 {
            self.facing = 1.0;
        } else if dir < 0.0 {
            self.facing = -1.0;
        }
    }

    /// Bottom edge in world units
    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y + self.bbox.max.y
    }

    /// Refresh the grounded flag, integrate gravity and move through the grid
    pub fn step_motion(&mut self, grid: &TileGrid, dt: f32) {
        self.grounded =
            !self.behavior.flies() && is_grounded(grid, self.pos, &self.bbox, self.vel.y);
        if !self.grounded {
            self.vel.y += self.gravity * dt;
        }
        self.vel.y = self.vel.y.min(MAX_FALL_SPEED);
        self.displace(grid, self.vel * dt);
    }

    /// Move by `delta`, X first then Y
    pub fn displace(&mut self, grid: &TileGrid, delta: Vec2) {
        let x = move_axis(grid, self.pos, &self.bbox, self.vel.x, Axis::X, delta.x);
        self.pos = x.pos;
        self.vel.x = x.velocity;
        if x.blocked {
            self.touched_wall = true;
        }

        let y = move_axis(grid, self.pos, &self.bbox, self.vel.y, Axis::Y, delta.y);
        self.pos = y.pos;
        self.vel.y = y.velocity;
    }
}
