//! Stage tile frames
//!
//! Empty cells get occasional decoration (grass on top of large blocks,
//! rocks elsewhere) and large-block centers vary between two looks. The
//! choice comes from a PCG stream seeded per world and advanced once per
//! cell in column-major order, so it is stable between frames no matter
//! which part of the stage is on screen.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Sheet, SheetCell, Sprite, ViewRect};
use crate::consts::CELL;
use crate::sim::anim::AnimTimer;
use crate::sim::grid::Tile;
use crate::sim::state::World;

/// Chance of grass on an empty cell above a large block
pub const GRASS_CHANCE: f32 = 0.25;
/// Chance of rocks on any other empty cell
pub const DECOR_CHANCE: f32 = 0.02;
/// Lava surface wave cycles per second
pub const LAVA_WAVE_FREQUENCY: f64 = 0.8;

/// Surface wave phase (0 or 1) at `time`
pub fn lava_wave(time: f64) -> u32 {
    if (time * LAVA_WAVE_FREQUENCY) % 1.0 > 0.5 { 1 } else { 0 }
}

/// Inputs for picking one cell's frame
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub column: i32,
    /// Tile directly below (empty past the bottom row)
    pub below: Tile,
    /// Per-cell random value in [0, 1)
    pub modifier: f32,
    pub wave: u32,
    /// Goal portal is hidden once the stage is complete
    pub portal: Option<&'a AnimTimer>,
}

/// Sheet and frame for `tile`, or `None` if nothing is drawn there.
/// The foreground layer only carries lava.
pub fn tile_cell(tile: Tile, ctx: &CellContext<'_>, foreground: bool) -> Option<(Sheet, SheetCell)> {
    let round = |v: f32| v.round() as u32;
    let m = ctx.modifier;
    let lava_surface = || 4 + if ctx.column % 2 == 0 { ctx.wave } else { 1 - ctx.wave };

    let cell = match tile {
        Tile::LAVA => SheetCell::new(4, 1),
        Tile::LAVA_SURFACE => SheetCell::new(lava_surface(), 0),
        _ if foreground => return None,

        Tile::EMPTY => {
            if ctx.below.is_block_a() {
                if m >= GRASS_CHANCE {
                    return None;
                }
                SheetCell::new(round(m * 3.0), 2)
            } else if m < DECOR_CHANCE {
                SheetCell::new(2 + round(m / DECOR_CHANCE), 1)
            } else {
                return None;
            }
        }
        Tile::GOAL => {
            let portal = ctx.portal?;
            return Some((Sheet::Items, SheetCell::new(portal.frame(), 0)));
        }
        t if t.is_block_a() => match t.0 - Tile::BLOCK_A_BASE {
            0 => SheetCell::new(1 + round(0.25 + 0.75 * m), 4),
            1 => SheetCell::new(1 + round(m), 3),
            2 => SheetCell::new(1 + round(m), 0),
            3 => SheetCell::new(0, 4),
            4 => SheetCell::new(0, 3),
            5 => SheetCell::new(0, 0),
            6 => SheetCell::new(3, 4),
            7 => SheetCell::new(3, 3),
            8 => SheetCell::new(3, 0),
            _ => return None,
        },
        t if t.is_block_b() => match t.0 - Tile::BLOCK_B_BASE {
            0 => SheetCell::new(5, 2),
            1 => SheetCell::new(6, 0),
            2 => SheetCell::new(7, 0),
            3 => SheetCell::new(7, 3),
            4 => SheetCell::new(7, 4),
            5 => SheetCell::new(6, 1),
            6 => SheetCell::new(7, 1),
            7 => SheetCell::new(6, 2),
            _ => SheetCell::new(7, 2),
        },
        _ => return None,
    };
    Some((Sheet::Tiles, cell))
}

/// Visible stage tiles for the background or foreground layer
pub fn stage_layer(world: &World, view: &ViewRect, foreground: bool) -> Vec<Sprite> {
    let grid = &world.stage.grid;
    let mut rng = Pcg32::seed_from_u64(world.decor_seed);
    let wave = lava_wave(world.time);
    let portal = (!world.player.ended).then_some(&world.portal_anim);

    let mut sprites = Vec::new();
    for i in 0..grid.width() as i32 {
        for j in 0..grid.height() as i32 {
            // drawn before culling so off-screen cells keep the stream aligned
            let modifier: f32 = rng.random();
            if !view.sees_cell(i, j) {
                continue;
            }
            let ctx = CellContext {
                column: i,
                below: grid.get(i, j + 1),
                modifier,
                wave,
                portal,
            };
            if let Some((sheet, cell)) = tile_cell(grid.get(i, j), &ctx, foreground) {
                sprites.push(Sprite {
                    sheet,
                    cell,
                    pos: Vec2::new(i as f32 * CELL, j as f32 * CELL),
                    flip_x: false,
                });
            }
        }
    }
    sprites
}
