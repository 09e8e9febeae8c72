//! Collectible coins

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::Player;

/// Pickup distance on each axis
pub const PICKUP_RANGE: f32 = 12.0;
/// Fade progress per second once collected
pub const FADE_SPEED: f32 = 5.0;
/// How far a collected coin rises while fading
pub const FADE_ASCEND: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    /// 0 while idle, (0, 1) while fading, 1 once gone
    pub fade: f32,
}

impl Coin {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, fade: 0.0 }
    }

    #[inline]
    pub fn is_collected(&self) -> bool {
        self.fade > 0.0
    }

    #[inline]
    pub fn is_gone(&self) -> bool {
        self.fade >= 1.0
    }

    /// Draw offset while fading out
    pub fn lift(&self) -> f32 {
        self.fade * FADE_ASCEND
    }

    /// Fade if collected, otherwise check for pickup. Returns true on pickup.
    pub fn tick(&mut self, player: &mut Player, dt: f32) -> bool {
        if self.is_collected() {
            self.fade = (self.fade + FADE_SPEED * dt).min(1.0);
            return false;
        }
        let d = (self.pos - player.pos()).abs();
        if !player.dead && d.x < PICKUP_RANGE && d.y < PICKUP_RANGE {
            self.fade = 0.001;
            player.coins_collected += 1;
            return true;
        }
        false
    }
}
