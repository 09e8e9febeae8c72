//! Presentation module
//!
//! Turns a `World` into a draw list: which cell of which sprite sheet goes
//! where, in draw order. Producing pixels is left to the host; nothing here
//! touches a window or a GPU.

pub mod hud;
pub mod sprites;
pub mod tiles;

use glam::Vec2;

use crate::consts::CELL;
use crate::sim::state::World;

pub use hud::{TextLine, health_meter_row, stage_complete_text};
pub use sprites::{coin_sprite, enemy_sprite, player_sprite};
pub use tiles::{lava_wave, stage_layer, tile_cell};

/// Clear color behind the stage (dark blue)
pub const BACKGROUND: [u8; 3] = [2, 23, 33];

/// Sprite sheets, each a grid of `CELL`-sized frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
    Tiles,
    Items,
    Player,
    Enemies,
    Meter,
}

/// Column/row of a frame on a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetCell {
    pub col: u32,
    pub row: u32,
}

impl SheetCell {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// One frame placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub sheet: Sheet,
    pub cell: SheetCell,
    /// Top-left corner in world units
    pub pos: Vec2,
    /// Mirror horizontally (characters facing left)
    pub flip_x: bool,
}

/// Visible world rectangle around the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ViewRect {
    pub fn around(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Whether any of the cell at `(i, j)` can be seen
    pub fn sees_cell(&self, i: i32, j: i32) -> bool {
        let x = i as f32 * CELL;
        let y = j as f32 * CELL;
        !(x + CELL < self.min.x || y + CELL < self.min.y || x > self.max.x || y > self.max.y)
    }

    /// Whether a box of half-size `reach` around `pos` can be seen
    pub fn sees(&self, pos: Vec2, reach: f32) -> bool {
        !(pos.x + reach < self.min.x
            || pos.y + reach < self.min.y
            || pos.x - reach > self.max.x
            || pos.y - reach > self.max.y)
    }
}

/// Everything to draw for one frame, in draw order
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// World position at the center of the screen
    pub camera: Vec2,
    pub background: Vec<Sprite>,
    pub enemies: Vec<Sprite>,
    pub player: Option<Sprite>,
    /// Lava drawn over characters
    pub foreground: Vec<Sprite>,
    pub coins: Vec<Sprite>,
    /// Row of the health meter sheet to show, if any
    pub health_row: Option<u32>,
    /// Stage-complete text, offsets relative to the camera
    pub text: Vec<TextLine>,
}

/// Build the draw list for the current world state
pub fn build_frame(world: &World) -> Frame {
    let view = ViewRect::around(world.camera.target, world.camera.view);
    Frame {
        camera: world.camera.target,
        background: stage_layer(world, &view, false),
        enemies: world.enemies.iter().map(enemy_sprite).collect(),
        player: player_sprite(&world.player),
        foreground: stage_layer(world, &view, true),
        coins: world
            .visible_coins()
            .filter(|(_, c)| view.sees(c.pos, crate::sim::coin::PICKUP_RANGE))
            .map(|(_, c)| coin_sprite(c, &world.coin_anim))
            .collect(),
        health_row: health_meter_row(&world.player),
        text: stage_complete_text(world),
    }
}

/// Top-left of a cell-sized sprite centered on `pos`
#[inline]
pub(crate) fn sprite_origin(pos: Vec2) -> Vec2 {
    pos - Vec2::splat(CELL * 0.5)
}
