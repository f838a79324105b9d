//! Q16.16 Fixed-Point Arithmetic
//!
//! Deterministic fixed-point math for the maze simulation.
//! Positions and speeds are pixels in Q16.16; no floats in movement logic.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 pixels                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A 20x20 maze of 40 pixel tiles spans 800 pixels, far inside the range.
//! Every speed used by the simulation divides the tile size exactly, so
//! grid alignment is reached with exact integer equality.

/// Q16.16 fixed-point number stored as i32.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE;

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1;

// =============================================================================
// GAME CONSTANTS (All as integer literals - NO float conversion!)
// =============================================================================

/// Tile edge in pixels.
pub const TILE_PIXELS: i32 = 40;

/// Tile edge: 40.0 = 40 * 65536 = 2621440
pub const TILE_SIZE: Fixed = TILE_PIXELS << FIXED_SCALE;

/// Player speed: 4.0 px/tick
pub const PLAYER_SPEED: Fixed = 262144;

/// Pursuer speed in approach mode: 2.5 px/tick
pub const APPROACH_SPEED: Fixed = 163840;

/// Pursuer speed in retreat mode: 4.0 px/tick
pub const RETREAT_SPEED: Fixed = 262144;

/// Pursuer speed while frightened: 1.0 px/tick
pub const FRIGHTENED_SPEED: Fixed = 65536;

/// Pursuer speed while returning to spawn: 8.0 px/tick
pub const DEAD_SPEED: Fixed = 524288;

// =============================================================================
// CORE OPERATIONS
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in tick loop.
///
/// # Example
/// ```
/// use maze_chase::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display/rendering.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Whole pixels to fixed-point.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Floor to whole pixels.
///
/// Arithmetic shift rounds toward negative infinity, so positions just left of
/// the origin land on pixel -1 rather than 0.
#[inline]
pub const fn floor_to_int(f: Fixed) -> i32 {
    f >> FIXED_SCALE
}

/// Tile index containing the given pixel coordinate (floor division).
#[inline]
pub const fn tile_of(f: Fixed) -> i32 {
    f.div_euclid(TILE_SIZE)
}

/// Is the coordinate an exact multiple of the tile size?
#[inline]
pub const fn is_tile_aligned(f: Fixed) -> bool {
    f.rem_euclid(TILE_SIZE) == 0
}

// =============================================================================
// TESTS
// =============================================================================
