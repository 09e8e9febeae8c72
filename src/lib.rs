//! Lava Leap - A tile-based platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stage loading, physics, entity behavior)
//! - `renderer`: Sprite/frame selection for an external drawing layer
//! - `runner`: Fixed-timestep host loop glue
//! - `settings`: JSON configuration

pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;

pub use runner::Runner;
pub use settings::{Settings, SettingsError, Viewport};

/// Game configuration constants
pub mod consts {
    /// Size of one tile in world units
    pub const CELL: f32 = 16.0;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: f64 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = (1.0 / TICK_RATE) as f32;
    /// Real-time backlog above which pending ticks are dropped instead of replayed
    pub const MAX_BACKLOG_SECS: f64 = 0.5;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 300.0;
    /// Terminal fall speed (units/s)
    pub const MAX_FALL_SPEED: f32 = 150.0;
    /// Gap left between a blocked edge and the cell boundary it ran into
    pub const CONTACT_EPSILON: f32 = 1.0;
    /// Distance below the feet probed for ground
    pub const GROUND_PROBE: f32 = 1.0;

    /// Stage size limits (in cells, legend row excluded)
    pub const MAX_STAGE_WIDTH: u32 = 1024;
    pub const MAX_STAGE_HEIGHT: u32 = 1024;
    /// Number of legend entries read from the top row of a stage source
    pub const LEGEND_TYPES: usize = 20;

    /// Player start used when a stage has no start marker
    pub const DEFAULT_START_X: f32 = 128.0;
    pub const DEFAULT_START_Y: f32 = 128.0;
}

/// Cell index containing world coordinate `v` (floors, so negatives map below zero)
#[inline]
pub fn cell_of(v: f32) -> i32 {
    (v / consts::CELL).floor() as i32
}

/// Center of cell `(i, j)` in world units
#[inline]
pub fn cell_center(i: i32, j: i32) -> glam::Vec2 {
    glam::Vec2::new(
        consts::CELL * (i as f32 + 0.5),
        consts::CELL * (j as f32 + 0.5),
    )
}
