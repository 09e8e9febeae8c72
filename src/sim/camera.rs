//! View target that follows the player and stays inside the stage

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position at the center of the view
    pub target: Vec2,
    /// Fraction of the remaining distance covered per tick (1 = snap)
    pub lerp: f32,
    /// Visible extent in world units
    pub view: Vec2,
}

impl Camera {
    /// `viewport` is in screen pixels, `scale` in screen pixels per world unit
    pub fn new(target: Vec2, lerp: f32, viewport: Vec2, scale: f32) -> Self {
        Self {
            target,
            lerp,
            view: viewport / scale.max(f32::EPSILON),
        }
    }

    /// Move toward `focus`, then keep the view inside `[0, stage_size]`.
    /// On a stage smaller than the view the camera pins to the top-left bound.
    pub fn follow(&mut self, focus: Vec2, stage_size: Vec2) {
        self.target += self.lerp * (focus - self.target);
        let half = self.view * 0.5;
        self.target = self.target.min(stage_size - half).max(half);
    }
}
