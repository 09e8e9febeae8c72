//! Tile grid and tile code taxonomy
//!
//! Codes keep fixed numeric ranges so autotiled variants can be derived
//! arithmetically from a family base.

use serde::{Deserialize, Serialize};

/// A single tile code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Tile(pub u8);

impl Tile {
    pub const EMPTY: Tile = Tile(0);
    pub const PLAYER_START: Tile = Tile(3);
    pub const COIN: Tile = Tile(4);
    pub const SLIME: Tile = Tile(5);
    pub const BAT: Tile = Tile(6);
    pub const IMP: Tile = Tile(7);
    pub const LAVA: Tile = Tile(8);
    pub const GOAL: Tile = Tile(9);
    pub const LAVA_SURFACE: Tile = Tile(19);

    /// Small-block family base (single block)
    pub const BLOCK_B_BASE: u8 = 20;
    /// Large-block family base (center piece)
    pub const BLOCK_A_BASE: u8 = 100;
    /// Variants per block family
    pub const FAMILY_SIZE: u8 = 9;

    pub const BLOCK_B: Tile = Tile(Self::BLOCK_B_BASE);
    pub const BLOCK_A: Tile = Tile(Self::BLOCK_A_BASE);

    /// Solid tiles block movement
    #[inline]
    pub fn is_solid(self) -> bool {
        self.0 >= Self::BLOCK_B_BASE
    }

    /// Any large-block variant
    #[inline]
    pub fn is_block_a(self) -> bool {
        self.0 >= Self::BLOCK_A_BASE
    }

    /// Any small-block variant
    #[inline]
    pub fn is_block_b(self) -> bool {
        (Self::BLOCK_B_BASE..Self::BLOCK_B_BASE + Self::FAMILY_SIZE).contains(&self.0)
    }

    #[inline]
    pub fn is_lava(self) -> bool {
        self == Self::LAVA || self == Self::LAVA_SURFACE
    }

    /// Large-block variant for the given edge flags
    pub fn block_a(top: bool, bottom: bool, left: bool, right: bool) -> Tile {
        let vertical = if top {
            1
        } else if bottom {
            2
        } else {
            0
        };
        let horizontal = if left {
            3
        } else if right {
            6
        } else {
            0
        };
        Tile(Self::BLOCK_A_BASE + vertical + horizontal)
    }

    /// Small-block variant by part
    pub fn block_b(part: BlockBPart) -> Tile {
        Tile(Self::BLOCK_B_BASE + part as u8)
    }
}

/// Parts of a small-block cluster, as offsets from the family base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockBPart {
    Single = 0,
    PairLeft = 1,
    PairRight = 2,
    PairTop = 3,
    PairBottom = 4,
    QuadTopLeft = 5,
    QuadTopRight = 6,
    QuadBottomLeft = 7,
    QuadBottomRight = 8,
}

/// Row-major grid of tile codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Create an all-empty grid
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Tile::EMPTY; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Stage width in world units
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * crate::consts::CELL
    }

    /// Stage height in world units
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * crate::consts::CELL
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Tile at `(x, y)`, or `Tile::EMPTY` outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(Tile::EMPTY, |i| self.cells[i])
    }

    /// Tile at `(x, y)` if in bounds
    #[inline]
    pub fn try_get(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write a tile; writes outside the grid are ignored
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = tile;
        }
    }

    /// Solidity query; out-of-range cells are open space
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_solid()
    }

    /// Any small-block variant at `(x, y)`
    #[inline]
    pub fn is_block_b(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_block_b()
    }

    /// Exactly the unconverted small-block base at `(x, y)`
    #[inline]
    pub fn is_block_b_base(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Tile::BLOCK_B
    }

    /// Raw cells, row-major
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Iterate `(x, y, tile)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        let w = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &t)| ((i % w) as i32, (i / w) as i32, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_block_a_variants_are_distinct() {
        let mut seen = Vec::new();
        for top in [false, true] {
            for bottom in [false, true] {
                for left in [false, true] {
                    for right in [false, true] {
                        let t = Tile::block_a(top, bottom, left, right);
                        assert!(t.is_block_a());
                        if !seen.contains(&t) {
                            seen.push(t);
                        }
                    }
                }
            }
        }
        assert_eq!(seen.len(), Tile::FAMILY_SIZE as usize);
        assert_eq!(Tile::block_a(false, false, false, false), Tile::BLOCK_A);
    }

    #[test]
    fn test_family_predicates() {
        assert!(Tile::block_b(BlockBPart::QuadBottomRight).is_block_b());
        assert!(!Tile::BLOCK_A.is_block_b());
        assert!(Tile::BLOCK_B.is_solid());
        assert!(Tile::BLOCK_A.is_solid());
        assert!(!Tile::LAVA.is_solid());
        assert!(!Tile::LAVA_SURFACE.is_solid());
        assert!(!Tile::GOAL.is_solid());
    }

    #[test]
    fn test_set_get_roundtrip_in_bounds() {
        let mut grid = TileGrid::new(4, 3);
        grid.set(3, 2, Tile::GOAL);
        assert_eq!(grid.get(3, 2), Tile::GOAL);
        assert_eq!(grid.iter().filter(|&(_, _, t)| t == Tile::GOAL).count(), 1);
        assert_eq!(grid.iter().last(), Some((3, 2, Tile::GOAL)));
    }

    proptest! {
        #[test]
        fn out_of_bounds_is_open_space(x in -2000i32..2000, y in -2000i32..2000) {
            let mut grid = TileGrid::new(8, 6);
            for j in 0..6 {
                for i in 0..8 {
                    let t = if (i + j) % 2 == 0 { Tile::BLOCK_B } else { Tile::BLOCK_A };
                    grid.set(i, j, t);
                }
            }
            if !grid.in_bounds(x, y) {
                prop_assert!(!grid.is_solid(x, y));
                prop_assert!(!grid.is_block_b(x, y));
                prop_assert_eq!(grid.get(x, y), Tile::EMPTY);
            } else {
                prop_assert!(grid.is_solid(x, y));
            }
        }
    }
}
