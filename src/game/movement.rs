//! Grid-Aligned Movement
//!
//! The one movement primitive shared by the player and the pursuers. A mover
//! steps along a single axis; if the tile its leading edge would enter is
//! blocked at either perpendicular corner, it is snapped flush against that
//! tile instead.
//!
//! ```text
//!   moving right, tile tx blocked:
//!
//!   ┌──────┬──────┐
//!   │  ┌──┐│XXXXXX│      x = tx * TILE - 2*bx - bw
//!   │  │▓▓││XXXXXX│      (box edge touches the wall, never enters it)
//!   │  └──┘│XXXXXX│
//!   └──────┴──────┘
//! ```

use crate::core::fixed::{Fixed, TILE_SIZE, tile_of, is_tile_aligned};
use crate::core::vec2::FixedVec2;
use crate::game::grid::Grid;
use crate::game::state::{Bounds, Direction};

/// Tile the leading edge would enter after moving `speed` along `dir`.
#[inline]
fn leading_tile(pos: FixedVec2, bounds: Bounds, dir: Direction, speed: Fixed) -> i32 {
    match dir {
        Direction::Right => tile_of(pos.x + speed + bounds.x + bounds.w),
        Direction::Left => tile_of(pos.x - speed + bounds.x),
        Direction::Up => tile_of(pos.y - speed + bounds.y),
        Direction::Down => tile_of(pos.y + speed + bounds.y + bounds.h),
    }
}

/// Both perpendicular corners of the leading edge land on free tiles.
#[inline]
fn lane_free(grid: &Grid, pos: FixedVec2, bounds: Bounds, dir: Direction, lead: i32) -> bool {
    if dir.is_horizontal() {
        !grid.is_obstacle(lead, tile_of(pos.y + bounds.y))
            && !grid.is_obstacle(lead, tile_of(pos.y + bounds.y + bounds.h))
    } else {
        !grid.is_obstacle(tile_of(pos.x + bounds.x), lead)
            && !grid.is_obstacle(tile_of(pos.x + bounds.x + bounds.w), lead)
    }
}

/// Could a mover take a full step of `speed` along `dir`?
pub fn can_go(grid: &Grid, pos: FixedVec2, bounds: Bounds, dir: Direction, speed: Fixed) -> bool {
    let lead = leading_tile(pos, bounds, dir, speed);
    lane_free(grid, pos, bounds, dir, lead)
}

/// Apply one step along `dir`. Blocked steps snap flush to the blocking tile.
pub fn step(grid: &Grid, pos: FixedVec2, bounds: Bounds, dir: Direction, speed: Fixed) -> FixedVec2 {
    let lead = leading_tile(pos, bounds, dir, speed);
    let free = lane_free(grid, pos, bounds, dir, lead);

    match dir {
        Direction::Right => FixedVec2::new(
            if free { pos.x + speed } else { lead * TILE_SIZE - 2 * bounds.x - bounds.w },
            pos.y,
        ),
        Direction::Left => FixedVec2::new(
            if free { pos.x - speed } else { lead * TILE_SIZE + TILE_SIZE },
            pos.y,
        ),
        Direction::Up => FixedVec2::new(
            pos.x,
            if free { pos.y - speed } else { lead * TILE_SIZE + TILE_SIZE },
        ),
        Direction::Down => FixedVec2::new(
            pos.x,
            if free { pos.y + speed } else { lead * TILE_SIZE - 2 * bounds.y - bounds.h },
        ),
    }
}

/// Resolve the player's direction for this tick.
///
/// Same-axis intent applies at once. An orthogonal turn is taken only when
/// the player sits exactly on the grid along its current axis of travel and
/// the new lane is open; otherwise the player keeps going the way it faces.
/// No intent means standing still.
pub fn steer_player(
    grid: &Grid,
    pos: FixedVec2,
    facing: Direction,
    intent: Option<Direction>,
    speed: Fixed,
) -> Option<Direction> {
    let wanted = intent?;
    if wanted.same_axis(facing) {
        return Some(wanted);
    }

    let aligned = if facing.is_horizontal() {
        is_tile_aligned(pos.x)
    } else {
        is_tile_aligned(pos.y)
    };

    if aligned && can_go(grid, pos, Bounds::PLAYER, wanted, speed) {
        Some(wanted)
    } else {
        Some(facing)
    }
}

// =============================================================================
// TESTS
// =============================================================================
