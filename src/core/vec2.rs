//! Fixed-Point 2D Vector and Tile Coordinates
//!
//! Continuous pixel positions use [`FixedVec2`]; discrete grid addresses use
//! [`TilePos`]. All operations are integer-only.

use std::fmt;
use std::ops::{Add, Sub};
use serde::{Serialize, Deserialize};

use super::fixed::{
    Fixed, FIXED_ONE, FIXED_SCALE, TILE_SIZE,
    tile_of, is_tile_aligned,
};

/// 2D vector with fixed-point components (pixels).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec2 {
    /// X component (Q16.16 fixed-point)
    pub x: Fixed,
    /// Y component (Q16.16 fixed-point), growing downward
    pub y: Fixed,
}

impl FixedVec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from whole-pixel components.
    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: x << FIXED_SCALE,
            y: y << FIXED_SCALE,
        }
    }

    /// Top-left pixel corner of a tile.
    #[inline]
    pub const fn from_tile(tile: TilePos) -> Self {
        Self {
            x: tile.col * TILE_SIZE,
            y: tile.row * TILE_SIZE,
        }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_add(other.x),
            y: self.y.wrapping_add(other.y),
        }
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_sub(other.x),
            y: self.y.wrapping_sub(other.y),
        }
    }

    /// Divide both components by an integer (truncating).
    #[inline]
    pub fn div_int(self, divisor: i32) -> Self {
        if divisor == 0 {
            return Self::ZERO;
        }
        Self {
            x: self.x / divisor,
            y: self.y / divisor,
        }
    }

    /// Tile containing this position's top-left corner.
    #[inline]
    pub fn tile(self) -> TilePos {
        TilePos::new(tile_of(self.x), tile_of(self.y))
    }

    /// True when both components sit exactly on the tile grid.
    #[inline]
    pub fn is_grid_aligned(self) -> bool {
        is_tile_aligned(self.x) && is_tile_aligned(self.y)
    }

    /// Convert to float tuple for rendering.
    #[inline]
    pub fn to_floats(self) -> (f32, f32) {
        (
            self.x as f32 / FIXED_ONE as f32,
            self.y as f32 / FIXED_ONE as f32,
        )
    }
}

impl Add for FixedVec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        FixedVec2::add(self, rhs)
    }
}

impl Sub for FixedVec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        FixedVec2::sub(self, rhs)
    }
}

impl fmt::Debug for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "Vec2({:.3}, {:.3})", fx, fy)
    }
}

impl fmt::Display for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "({:.3}, {:.3})", fx, fy)
    }
}

// =============================================================================
// TILE COORDINATES
// =============================================================================

/// Integer tile address. May lie outside the grid (corner targets do).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TilePos {
    /// Column (x)
    pub col: i32,
    /// Row (y), growing downward
    pub row: i32,
}

impl TilePos {
    /// Create a tile address.
    #[inline]
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Offset by a whole number of tiles.
    #[inline]
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }

    /// Squared Euclidean distance in tiles.
    ///
    /// Ordering by squared distance matches ordering by true distance, so
    /// comparisons never need a square root.
    #[inline]
    pub const fn distance_squared(self, other: Self) -> i32 {
        let dc = self.col - other.col;
        let dr = self.row - other.row;
        dc * dc + dr * dr
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.col, self.row)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;

    #[test]
    fn test_vec2_add_sub() {
        let a = FixedVec2::new(to_fixed(5.0), to_fixed(7.0));
        let b = FixedVec2::new(to_fixed(2.0), to_fixed(3.0));
        assert_eq!(a + b, FixedVec2::new(to_fixed(7.0), to_fixed(10.0)));
        assert_eq!(a - b, FixedVec2::new(to_fixed(3.0), to_fixed(4.0)));
    }

    #[test]
    fn test_from_tile_round_trips_through_tile() {
        let tile = TilePos::new(3, 17);
        let pos = FixedVec2::from_tile(tile);
        assert_eq!(pos, FixedVec2::from_ints(120, 680));
        assert_eq!(pos.tile(), tile);
        assert!(pos.is_grid_aligned());
    }

    #[test]
    fn test_alignment_requires_both_axes() {
        let pos = FixedVec2::new(TILE_SIZE, TILE_SIZE + to_fixed(2.5));
        assert!(!pos.is_grid_aligned());
        assert_eq!(pos.tile(), TilePos::new(1, 1));
    }

    #[test]
    fn test_div_int_steps() {
        let gap = FixedVec2::from_ints(100, -50);
        assert_eq!(gap.div_int(5), FixedVec2::from_ints(20, -10));
        assert_eq!(gap.div_int(0), FixedVec2::ZERO);
    }

    #[test]
    fn test_tile_distance_squared() {
        let a = TilePos::new(0, 0);
        let b = TilePos::new(3, 4);
        assert_eq!(a.distance_squared(b), 25);
        assert_eq!(b.distance_squared(a), 25);
        assert_eq!(a.offset(-1, -1), TilePos::new(-1, -1));
    }
}
