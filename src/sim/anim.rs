//! Animation phase timers
//!
//! A timer holds a phase in `[0, 1]` that maps onto `frames` sprite frames.
//! Timers only track presentation state; no gameplay decision reads them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimTimer {
    pub phase: f32,
    pub speed: f32,
    pub direction: f32,
    pub frames: u32,
}

impl AnimTimer {
    pub const fn new(phase: f32, speed: f32, frames: u32) -> Self {
        Self {
            phase,
            speed,
            direction: 1.0,
            frames,
        }
    }

    /// Lowest phase a ping-pong cycle reaches (middle of the first frame)
    #[inline]
    pub fn low_bound(&self) -> f32 {
        0.5 / self.frames as f32
    }

    /// Highest phase a ping-pong cycle reaches (middle of the last frame)
    #[inline]
    pub fn high_bound(&self) -> f32 {
        1.0 - 0.5 / self.frames as f32
    }

    /// Advance back and forth between the middles of the first and last frames
    pub fn animate_ping_pong(&mut self, dt: f32) {
        self.phase += self.speed * self.direction * dt;
        if self.direction > 0.0 && self.phase > self.high_bound() {
            self.direction = -self.direction;
            self.phase = self.high_bound();
        } else if self.direction < 0.0 && self.phase < self.low_bound() {
            self.direction = -self.direction;
            self.phase = self.low_bound();
        }
    }

    /// Advance and wrap around modulo 1
    pub fn animate_sequential(&mut self, dt: f32) {
        self.phase += self.speed * self.direction * dt;
        if self.direction > 0.0 && self.phase >= 1.0 {
            self.phase -= 1.0;
        } else if self.direction < 0.0 && self.phase < 0.0 {
            self.phase += 1.0;
        }
    }

    /// Drift toward `target` at the timer's speed and face forward again.
    /// Idle characters use this to settle on a resting frame.
    pub fn ease_toward(&mut self, target: f32, dt: f32) {
        let step = if self.phase > target { -1.0 } else { 1.0 };
        self.phase += self.speed * step * dt;
        self.direction = 1.0;
    }

    /// Frame index for the current phase
    pub fn frame(&self) -> u32 {
        ((self.phase * self.frames as f32) as u32).min(self.frames.saturating_sub(1))
    }
}
