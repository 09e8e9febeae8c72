//! Stage loading and autotiling
//!
//! A stage source is a small raster image. The top row is a legend: pixel `k`
//! holds the color that stands for logical tile type `k`. Every following row
//! is one row of the map. Loading classifies pixels against the legend, then
//! makes a single row-major sweep that:
//! - picks edge/corner variants for large blocks,
//! - groups small blocks into pairs and 2x2 clusters,
//! - turns spawn markers into spawn descriptors,
//! - marks the exposed top of each lava pool.
//!
//! The sweep writes into the grid it is reading, so its order is part of the
//! output format.

use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{BlockBPart, Tile, TileGrid};
use crate::cell_center;
use crate::consts::*;

/// Errors from loading a stage
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("stage source {name} is unreadable: {reason}")]
    SourceUnreadable { name: String, reason: String },

    #[error("stage is {width}x{height} cells, limit is {max_width}x{max_height}")]
    DimensionsExceeded {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("stage source is {width}x{height} pixels and has no map rows")]
    Empty { width: u32, height: u32 },

    #[error("tile family ranges are misconfigured (small base {block_b}, large base {block_a})")]
    InvalidTileConfiguration { block_b: u8, block_a: u8 },

    #[error("no stage sources configured")]
    NoStages,
}

/// Raw stage pixels, ARGB packed, row-major. Row 0 is the legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelGrid {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

/// Colors used for the generated legend of glyph-authored stages
const GLYPH_PALETTE: [u32; 10] = [
    0xFF02_1721, // empty
    0xFF80_4020, // large block
    0xFF60_6060, // small block
    0xFF00_FF00, // player start
    0xFFFF_D700, // coin
    0xFF40_C040, // slime
    0xFF80_00FF, // bat
    0xFFC0_2020, // imp
    0xFFFF_6000, // lava
    0xFF00_C0FF, // goal
];

/// Logical legend index for a stage glyph
fn glyph_type(c: char) -> Option<usize> {
    Some(match c {
        '.' | ' ' => 0,
        '#' => 1,
        'b' => 2,
        'P' => 3,
        'c' => 4,
        's' => 5,
        'v' => 6,
        'i' => 7,
        '~' => 8,
        'G' => 9,
        _ => return None,
    })
}

impl PixelGrid {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Build a stage source from text rows, generating the legend row.
    ///
    /// `.` empty, `#` large block, `b` small block, `P` player start, `c` coin,
    /// `s` slime, `v` bat, `i` imp, `~` lava, `G` goal. Unknown glyphs become
    /// a color missing from the legend (and so load as empty). Short rows are
    /// padded with empty cells.
    pub fn from_glyphs(rows: &[&str]) -> Self {
        let width = rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
            .max(GLYPH_PALETTE.len()) as u32;
        let height = rows.len() as u32 + 1;

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for x in 0..width as usize {
            pixels.push(GLYPH_PALETTE.get(x).copied().unwrap_or(0xFFFF_FFFF));
        }
        for row in rows {
            let mut count = 0;
            for c in row.chars() {
                let color = glyph_type(c).map_or(0xFF12_3456, |k| GLYPH_PALETTE[k]);
                pixels.push(color);
                count += 1;
            }
            for _ in count..width as usize {
                pixels.push(GLYPH_PALETTE[0]);
            }
        }
        Self::new(width, height, pixels)
    }

    /// Decode an image file (PNG or BMP)
    pub fn from_image_path(path: &std::path::Path) -> Result<Self, LoadError> {
        let img = image::open(path).map_err(|e| LoadError::SourceUnreadable {
            name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_rgba(&img.to_rgba8()))
    }

    /// Decode an in-memory image (PNG or BMP)
    pub fn from_image_bytes(name: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes).map_err(|e| LoadError::SourceUnreadable {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_rgba(&img.to_rgba8()))
    }

    fn from_rgba(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                u32::from_be_bytes([a, r, g, b])
            })
            .collect();
        Self::new(width, height, pixels)
    }
}

/// Where a stage comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageSource {
    File(PathBuf),
    Pixels(PixelGrid),
}

impl StageSource {
    /// Human-readable name for logs
    pub fn name(&self) -> String {
        match self {
            StageSource::File(path) => path.display().to_string(),
            StageSource::Pixels(p) => format!("<{}x{} pixels>", p.width, p.height),
        }
    }

    /// Read and autotile the stage
    pub fn load(&self) -> Result<Stage, LoadError> {
        match self {
            StageSource::File(path) => load_stage(&PixelGrid::from_image_path(path)?),
            StageSource::Pixels(pixels) => load_stage(pixels),
        }
    }
}

/// Kinds of entities spawned from stage markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Coin,
    Slime,
    Bat,
    Imp,
}

/// An entity to create when the stage goes live
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub kind: SpawnKind,
    pub pos: Vec2,
}

/// A loaded, autotiled stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub grid: TileGrid,
    pub player_start: Vec2,
    /// Coins and enemies, in scan order
    pub spawns: Vec<Spawn>,
}

impl Stage {
    /// Stage extent in world units (used to clamp the camera)
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.grid.pixel_width(), self.grid.pixel_height())
    }
}

const fn tile_bases_valid(block_b: u8, block_a: u8) -> bool {
    block_a >= 10 && block_b >= 10 && block_b + Tile::FAMILY_SIZE - 1 < block_a
}

const _: () = assert!(tile_bases_valid(Tile::BLOCK_B_BASE, Tile::BLOCK_A_BASE));

/// Verify the tile family ranges do not overlap the marker/lava codes or each other
pub fn check_tile_bases() -> Result<(), LoadError> {
    let (block_b, block_a) = (Tile::BLOCK_B_BASE, Tile::BLOCK_A_BASE);
    if !tile_bases_valid(block_b, block_a) {
        return Err(LoadError::InvalidTileConfiguration { block_b, block_a });
    }
    Ok(())
}

/// Parse and autotile a stage source
pub fn load_stage(source: &PixelGrid) -> Result<Stage, LoadError> {
    check_tile_bases()?;

    if source.width == 0 || source.height < 2 {
        return Err(LoadError::Empty {
            width: source.width,
            height: source.height,
        });
    }
    let width = source.width;
    let height = source.height - 1;
    if width > MAX_STAGE_WIDTH || height > MAX_STAGE_HEIGHT {
        return Err(LoadError::DimensionsExceeded {
            width,
            height,
            max_width: MAX_STAGE_WIDTH,
            max_height: MAX_STAGE_HEIGHT,
        });
    }

    let expected = source.width as usize * source.height as usize;
    if source.pixels.len() != expected {
        return Err(LoadError::SourceUnreadable {
            name: format!("<{}x{} pixels>", source.width, source.height),
            reason: format!("expected {expected} pixels, found {}", source.pixels.len()),
        });
    }

    let legend: Vec<u32> = (0..width.min(LEGEND_TYPES as u32))
        .map(|x| source.pixel(x, 0))
        .collect();

    let mut grid = TileGrid::new(width, height);
    for j in 0..height {
        for i in 0..width {
            let pixel = source.pixel(i, j + 1);
            if let Some(k) = legend.iter().position(|&c| c == pixel) {
                let tile = match k {
                    1 => Tile::BLOCK_A,
                    2 => Tile::BLOCK_B,
                    k => Tile(k as u8),
                };
                grid.set(i as i32, j as i32, tile);
            }
        }
    }

    let mut stage = Stage {
        grid,
        player_start: Vec2::new(DEFAULT_START_X, DEFAULT_START_Y),
        spawns: Vec::new(),
    };
    autotile(&mut stage);

    log::info!(
        "Stage loaded: {}x{} cells, {} spawns",
        width,
        height,
        stage.spawns.len()
    );
    Ok(stage)
}

fn autotile(stage: &mut Stage) {
    let (w, h) = (stage.grid.width() as i32, stage.grid.height() as i32);
    for j in 0..h {
        for i in 0..w {
            let tile = stage.grid.get(i, j);
            if tile.is_block_a() {
                let grid = &stage.grid;
                let non_a = |x, y| !grid.try_get(x, y).is_some_and(Tile::is_block_a);
                let top = non_a(i, j - 1);
                let bottom = !top && non_a(i, j + 1);
                let left = non_a(i - 1, j);
                let right = !left && non_a(i + 1, j);
                stage.grid.set(i, j, Tile::block_a(top, bottom, left, right));
            } else if tile == Tile::BLOCK_B {
                group_block_b(&mut stage.grid, i, j);
            } else if let Some((kind, lift)) = marker_spawn(tile) {
                stage.grid.set(i, j, Tile::EMPTY);
                let pos = cell_center(i, j) - Vec2::new(0.0, lift);
                match kind {
                    None => stage.player_start = pos,
                    Some(kind) => stage.spawns.push(Spawn { kind, pos }),
                }
            } else if tile == Tile::LAVA {
                if !stage.grid.try_get(i, j - 1).is_some_and(Tile::is_lava) {
                    stage.grid.set(i, j, Tile::LAVA_SURFACE);
                }
            }
        }
    }
}

/// Marker → spawn kind (`None` for the player start) and upward lift
fn marker_spawn(tile: Tile) -> Option<(Option<SpawnKind>, f32)> {
    match tile {
        Tile::PLAYER_START => Some((None, 1.0)),
        Tile::COIN => Some((Some(SpawnKind::Coin), 0.0)),
        Tile::SLIME => Some((Some(SpawnKind::Slime), 1.0)),
        Tile::BAT => Some((Some(SpawnKind::Bat), 1.0)),
        Tile::IMP => Some((Some(SpawnKind::Imp), 1.0)),
        _ => None,
    }
}

/// Convert a small-block base cell (and its partners) into pair or quad parts.
/// All conditions are read before any cell is written.
fn group_block_b(grid: &mut TileGrid, i: i32, j: i32) {
    use BlockBPart::*;

    let b = |x, y| grid.is_block_b(x, y);
    let base = |x, y| grid.is_block_b_base(x, y);

    let writes: &[(i32, i32, BlockBPart)] = if !b(i, j - 1) && !b(i, j + 1) {
        if !b(i - 1, j) && !b(i + 2, j) && base(i + 1, j) {
            &[(0, 0, PairLeft), (1, 0, PairRight)]
        } else if !b(i - 2, j) && !b(i + 1, j) && base(i - 1, j) {
            &[(-1, 0, PairLeft), (0, 0, PairRight)]
        } else {
            &[]
        }
    } else if !b(i - 1, j) && !b(i + 1, j) {
        if !b(i, j - 1) && !b(i, j + 2) && base(i, j + 1) {
            &[(0, 0, PairTop), (0, 1, PairBottom)]
        } else if !b(i, j - 2) && !b(i, j + 1) && base(i, j - 1) {
            &[(0, -1, PairTop), (0, 0, PairBottom)]
        } else {
            &[]
        }
    } else if base(i + 1, j) && base(i, j + 1) && base(i + 1, j + 1) {
        &[
            (0, 0, QuadTopLeft),
            (1, 0, QuadTopRight),
            (0, 1, QuadBottomLeft),
            (1, 1, QuadBottomRight),
        ]
    } else {
        &[]
    };

    for &(dx, dy, part) in writes {
        grid.set(i + dx, j + dy, Tile::block_b(part));
    }
}
