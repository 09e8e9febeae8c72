//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (arena order, then scan order of the stage)
//! - No rendering or platform dependencies
//!
//! The only I/O is reading a stage source when a stage is loaded.

pub mod anim;
pub mod camera;
pub mod character;
pub mod clock;
pub mod coin;
pub mod collision;
pub mod enemy;
pub mod grid;
pub mod player;
pub mod stage;
pub mod state;
pub mod tick;

pub use anim::AnimTimer;
pub use camera::Camera;
pub use character::{Behavior, Character};
pub use clock::{Advance, FixedClock};
pub use coin::Coin;
pub use collision::{Axis, AxisMove, BoundingBox, is_grounded, move_axis};
pub use enemy::{Enemy, EnemyKind};
pub use grid::{BlockBPart, Tile, TileGrid};
pub use player::{Player, PlayerSignal};
pub use stage::{
    LoadError, PixelGrid, Spawn, SpawnKind, Stage, StageSource, check_tile_bases, load_stage,
};
pub use state::{SimEvent, World};
pub use tick::{TickInput, tick};
