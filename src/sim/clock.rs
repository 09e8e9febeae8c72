//! Fixed-timestep clock
//!
//! Real elapsed time goes in, a whole number of simulation steps comes out.
//! A backlog larger than the tolerance (after a stall, a debugger break, a
//! suspended window) is thrown away rather than replayed in a burst.

use crate::consts::*;

/// What the host should do after feeding elapsed time to the clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// Simulation steps to run now
    pub ticks: u32,
    /// Timestep to pass to each of those steps (scaled)
    pub dt: f32,
    /// A redraw interval has passed
    pub draw: bool,
    /// The backlog exceeded the tolerance and was discarded
    pub dropped: bool,
}

#[derive(Debug, Clone)]
pub struct FixedClock {
    step: f64,
    max_backlog: f64,
    time_scale: f32,
    draw_interval: f64,
    accumulator: f64,
    draw_accumulator: f64,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(TICK_RATE, MAX_BACKLOG_SECS)
    }
}

impl FixedClock {
    /// `tick_rate` in steps per second; redraws default to the same cadence
    pub fn new(tick_rate: f64, max_backlog: f64) -> Self {
        let step = 1.0 / tick_rate.max(1.0);
        Self {
            step,
            max_backlog,
            time_scale: 1.0,
            draw_interval: step,
            accumulator: 0.0,
            draw_accumulator: 0.0,
        }
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_draw_rate(mut self, draw_rate: f64) -> Self {
        self.draw_interval = 1.0 / draw_rate.max(1.0);
        self
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Unscaled step length in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Simulated seconds per step after time scaling
    pub fn scaled_dt(&self) -> f32 {
        self.step as f32 * self.time_scale
    }

    /// Time accumulated toward the next step
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Feed `elapsed` real seconds
    pub fn advance(&mut self, elapsed: f64) -> Advance {
        let elapsed = elapsed.max(0.0);
        self.accumulator += elapsed;
        self.draw_accumulator += elapsed;

        let mut ticks = 0;
        let dropped = self.accumulator > self.max_backlog;
        if dropped {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        } else {
            while self.accumulator >= self.step {
                self.accumulator -= self.step;
                ticks += 1;
            }
        }

        let draw = self.draw_accumulator > self.draw_interval;
        if draw {
            self.draw_accumulator %= self.draw_interval;
        }

        Advance {
            ticks,
            dt: self.scaled_dt(),
            draw,
            dropped,
        }
    }
}
