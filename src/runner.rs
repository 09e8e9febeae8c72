//! Host loop glue
//!
//! A `Runner` pairs the fixed-timestep clock with a world. The host feeds it
//! the latest held input and the real time elapsed since the previous frame,
//! runs however many ticks are due, and redraws when asked to.

use std::path::Path;

use crate::settings::Settings;
use crate::sim::clock::{Advance, FixedClock};
use crate::sim::stage::LoadError;
use crate::sim::state::{SimEvent, World};
use crate::sim::tick::{TickInput, tick};

pub struct Runner {
    clock: FixedClock,
    world: World,
    input: TickInput,
    ticks: u64,
}

impl Runner {
    pub fn new(world: World, clock: FixedClock) -> Self {
        Self {
            clock,
            world,
            input: TickInput::default(),
            ticks: 0,
        }
    }

    /// Build the world from the configured stage list.
    /// Relative stage paths are resolved against `base`.
    pub fn from_settings(settings: &Settings, base: &Path) -> Result<Self, LoadError> {
        let world = World::new(settings.stage_sources(base))?;
        let start = world.player.pos();
        let world = world
            .with_camera(settings.camera(start))
            .with_decor_seed(settings.decor_seed);
        Ok(Self::new(world, settings.clock()))
    }

    /// Held input sampled by every following tick until replaced
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    pub fn input(&self) -> TickInput {
        self.input
    }

    /// Feed real elapsed seconds and run the ticks that are due
    pub fn update(&mut self, elapsed: f64) -> Advance {
        let advance = self.clock.advance(elapsed);
        for _ in 0..advance.ticks {
            tick(&mut self.world, &self.input, advance.dt);
        }
        self.ticks += advance.ticks as u64;
        advance
    }

    /// Run exactly one tick regardless of elapsed time
    pub fn step(&mut self) {
        let dt = self.clock.scaled_dt();
        tick(&mut self.world, &self.input, dt);
        self.ticks += 1;
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn clock_mut(&mut self) -> &mut FixedClock {
        &mut self.clock
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.drain_events()
    }
}
