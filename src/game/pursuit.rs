//! Pursuer AI
//!
//! Target-tile selection per variant and the greedy direction search that
//! turns a target into the next one-tile move. Decisions are only taken when
//! a pursuer is exactly grid-aligned; between tiles it keeps its facing.
//!
//! ## Targets
//!
//! | Variant | Approach | Retreat |
//! |---------|----------|---------|
//! | Pink (A) | player tile | (-1, -1) |
//! | Purple (B) | 4 ahead of player if dist > 6, else (w, h) | (w - 2, h) |
//! | Red (C) | player - (pink - player) | (w, -1) |
//! | Yellow (D) | random tile | (-1, h) |
//!
//! Frightened pursuers all target a random tile; eaten ones head to spawn.

use crate::core::rng::DeterministicRng;
use crate::core::vec2::TilePos;
use crate::game::grid::Grid;
use crate::game::mode::Phase;
use crate::game::state::{Direction, PursuerVariant};

/// Tiles ahead of the player variant B aims for.
pub const LOOKAHEAD_TILES: i32 = 4;

/// Squared tile distance above which variant B uses the lookahead target.
pub const PURPLE_NEAR_SQUARED: i32 = 36;

/// Everything a target rule may look at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetContext {
    /// Approach or Retreat
    pub phase: Phase,
    /// Deciding pursuer's tile
    pub own_tile: TilePos,
    /// Player's tile
    pub player_tile: TilePos,
    /// Player's facing
    pub player_facing: Direction,
    /// Variant A pursuer's tile, if there is one
    pub pink_tile: Option<TilePos>,
    /// Grid width in tiles
    pub width: i32,
    /// Grid height in tiles
    pub height: i32,
}

/// Target tile for a variant in Approach or Retreat.
///
/// Variant D draws from `rng`; no other variant touches it.
pub fn target_tile(variant: PursuerVariant, ctx: &TargetContext, rng: &mut DeterministicRng) -> TilePos {
    match ctx.phase {
        Phase::Approach => approach_target(variant, ctx, rng),
        Phase::Retreat => retreat_target(variant, ctx),
    }
}

fn approach_target(variant: PursuerVariant, ctx: &TargetContext, rng: &mut DeterministicRng) -> TilePos {
    let player = ctx.player_tile;
    match variant {
        PursuerVariant::Pink => player,
        PursuerVariant::Purple => {
            if ctx.own_tile.distance_squared(player) > PURPLE_NEAR_SQUARED {
                let (dx, dy) = ctx.player_facing.delta();
                player.offset(dx * LOOKAHEAD_TILES, dy * LOOKAHEAD_TILES)
            } else {
                TilePos::new(ctx.width, ctx.height)
            }
        }
        PursuerVariant::Red => match ctx.pink_tile {
            Some(pink) => TilePos::new(2 * player.col - pink.col, 2 * player.row - pink.row),
            None => player,
        },
        PursuerVariant::Yellow => random_tile(ctx, rng),
    }
}

fn retreat_target(variant: PursuerVariant, ctx: &TargetContext) -> TilePos {
    match variant {
        PursuerVariant::Pink => TilePos::new(-1, -1),
        PursuerVariant::Purple => TilePos::new(ctx.width - 2, ctx.height),
        PursuerVariant::Red => TilePos::new(ctx.width, -1),
        PursuerVariant::Yellow => TilePos::new(-1, ctx.height),
    }
}

/// Uniform tile inside the grid.
#[inline]
pub fn random_tile(ctx: &TargetContext, rng: &mut DeterministicRng) -> TilePos {
    rng.next_tile(ctx.width.max(1) as u32, ctx.height.max(1) as u32)
}

/// Open neighbour directions from `tile`, indexed by [`Direction::index`].
///
/// The reverse of `facing` is dropped unless it is the only way out.
pub fn open_directions(grid: &Grid, tile: TilePos, facing: Direction) -> [bool; 4] {
    let mut open = [false; 4];
    for dir in Direction::ALL {
        let (dx, dy) = dir.delta();
        open[dir.index()] = !grid.is_obstacle(tile.col + dx, tile.row + dy);
    }
    suppress_reverse(&mut open, facing);
    open
}

/// Clear the reverse of `facing` when more than one direction is open.
pub fn suppress_reverse(open: &mut [bool; 4], facing: Direction) {
    if open.iter().filter(|o| **o).count() > 1 {
        open[facing.opposite().index()] = false;
    }
}

/// Open direction whose neighbour tile is nearest `target`.
///
/// Ties go to the first direction in E, W, N, S order. `None` when nothing
/// is open.
pub fn choose_direction(open: &[bool; 4], tile: TilePos, target: TilePos) -> Option<Direction> {
    let mut best: Option<(Direction, i32)> = None;
    for dir in Direction::ALL {
        if !open[dir.index()] {
            continue;
        }
        let (dx, dy) = dir.delta();
        let dist = tile.offset(dx, dy).distance_squared(target);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((dir, dist)),
        }
    }
    best.map(|(dir, _)| dir)
}

// =============================================================================
// TESTS
// =============================================================================
