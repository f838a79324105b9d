//! Game State Definitions
//!
//! All state types for the maze simulation. Entities live in plain vectors
//! whose order is fixed at level load: items in row-major order, pursuers in
//! spawn order, then the player. That order is the collision scan order.

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::core::fixed::{Fixed, from_int};
use crate::core::vec2::{FixedVec2, TilePos};
use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::events::GameEvent;
use crate::game::grid::Grid;
use crate::game::input::InputLatch;
use crate::game::level::{LevelData, TileCode};
use crate::game::mode::{Mode, ModeController};
use crate::game::tick::SimConfig;

// =============================================================================
// DIRECTION
// =============================================================================

/// Axis direction. Declaration order (E, W, N, S) is the tie-break order
/// for pursuer decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// +x
    Right = 0,
    /// -x
    Left = 1,
    /// -y
    Up = 2,
    /// +y
    Down = 3,
}

impl Direction {
    /// All directions in decision order.
    pub const ALL: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];

    /// Reverse direction.
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Tile offset (dcol, drow).
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Moves along x?
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    /// Same axis as `other`?
    #[inline]
    pub fn same_axis(self, other: Direction) -> bool {
        self.is_horizontal() == other.is_horizontal()
    }

    /// Velocity of magnitude `speed` along this direction.
    #[inline]
    pub fn velocity(self, speed: Fixed) -> FixedVec2 {
        let (dx, dy) = self.delta();
        FixedVec2::new(dx * speed, dy * speed)
    }

    /// Index into per-direction arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// BOUNDING BOXES
// =============================================================================

/// Collision box relative to an entity's position (Q16.16 pixels).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Offset from position, x
    pub x: Fixed,
    /// Offset from position, y
    pub y: Fixed,
    /// Width
    pub w: Fixed,
    /// Height
    pub h: Fixed,
}

impl Bounds {
    /// Box from whole-pixel values.
    pub const fn pixels(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x: from_int(x), y: from_int(y), w: from_int(w), h: from_int(h) }
    }

    /// Player box.
    pub const PLAYER: Bounds = Bounds::pixels(1, 1, 38, 38);

    /// Pursuer box.
    pub const PURSUER: Bounds = Bounds::pixels(4, 2, 32, 36);

    /// Item box, a small square at the tile centre.
    pub const ITEM: Bounds = Bounds::pixels(19, 19, 2, 2);
}

// =============================================================================
// ENTITY KINDS
// =============================================================================

/// Pursuer variant; each has its own target rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PursuerVariant {
    /// Variant A: targets the player's tile
    Pink = 0,
    /// Variant B: targets ahead of the player when far away
    Purple = 1,
    /// Variant C: reflects variant A through the player
    Red = 2,
    /// Variant D: wanders to random tiles
    Yellow = 3,
}

/// Item category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ItemKind {
    /// Counts toward level completion
    Ordinary = 0,
    /// High-value bonus A
    BonusA = 1,
    /// High-value bonus B
    BonusB = 2,
    /// High-value bonus C
    BonusC = 3,
    /// Starts Frightened
    ModeTrigger = 4,
}

impl ItemKind {
    /// Reference score values.
    pub const fn default_score(self) -> u32 {
        match self {
            ItemKind::Ordinary => 1,
            ItemKind::BonusA => 200,
            ItemKind::BonusB => 100,
            ItemKind::BonusC => 150,
            ItemKind::ModeTrigger => 0,
        }
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// The player-controlled actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top-left position in pixels
    pub position: FixedVec2,
    /// Spawn position
    pub spawn: FixedVec2,
    /// Facing (updated whenever a move is attempted)
    pub facing: Direction,
}

impl PlayerState {
    /// Player standing at its spawn, facing right.
    pub fn new(spawn: FixedVec2) -> Self {
        Self { position: spawn, spawn, facing: Direction::Right }
    }

    /// Current tile.
    #[inline]
    pub fn tile(&self) -> TilePos {
        self.position.tile()
    }

    /// Back to spawn, facing right.
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.facing = Direction::Right;
    }
}

// =============================================================================
// PURSUER STATE
// =============================================================================

/// An autonomous pursuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PursuerState {
    /// Index in spawn order
    pub id: u8,
    /// Target-rule variant
    pub variant: PursuerVariant,
    /// Top-left position in pixels
    pub position: FixedVec2,
    /// Spawn position (grid-aligned)
    pub spawn: FixedVec2,
    /// Facing
    pub facing: Direction,
    /// Speed chosen at the last grid alignment
    pub speed: Fixed,
    /// Intended movement for the current tick
    pub velocity: FixedVec2,
    /// False while eaten and returning to spawn
    pub alive: bool,
    /// Cannot be eaten until the next Frightened starts
    pub immune: bool,
    /// Time left before an eaten pursuer may revive
    pub respawn_ms: i64,
    /// Tile steered toward at the last decision
    pub target: TilePos,
    /// Open neighbour directions at the last decision, indexed by [`Direction::index`]
    pub open: [bool; 4],
}

impl PursuerState {
    /// Create a pursuer at its spawn.
    pub fn new(id: u8, variant: PursuerVariant, spawn: FixedVec2, facing: Direction, speed: Fixed) -> Self {
        Self {
            id,
            variant,
            position: spawn,
            spawn,
            facing,
            speed,
            velocity: FixedVec2::ZERO,
            alive: true,
            immune: false,
            respawn_ms: 0,
            target: spawn.tile(),
            open: [false; 4],
        }
    }

    /// Current tile.
    #[inline]
    pub fn tile(&self) -> TilePos {
        self.position.tile()
    }

    /// Turn around.
    #[inline]
    pub fn flip(&mut self) {
        self.facing = self.facing.opposite();
    }

    /// Eaten by the player.
    pub fn kill(&mut self, respawn_ms: i64) {
        self.alive = false;
        self.respawn_ms = respawn_ms;
    }

    /// Back to life, immune until the next Frightened.
    pub fn revive(&mut self) {
        self.alive = true;
        self.immune = true;
        self.respawn_ms = 0;
    }

    /// Ready to revive: home and the countdown has run out.
    #[inline]
    pub fn can_revive(&self) -> bool {
        !self.alive && self.position == self.spawn && self.respawn_ms <= 0
    }
}

// =============================================================================
// ITEM STATE
// =============================================================================

/// A consumable item. Non-collidable: the player passes through it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    /// Stable id (row-major load order)
    pub id: u32,
    /// Category
    pub kind: ItemKind,
    /// Top-left of its tile
    pub position: FixedVec2,
    /// Cleared on consumption; compacted away by [`World::sweep`]
    pub active: bool,
}

// =============================================================================
// PROGRESS
// =============================================================================

/// Score, lives, level and the level-complete counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    /// Current score
    pub score: u32,
    /// Best score this session
    pub high_score: u32,
    /// Lives left
    pub lives: u32,
    /// 1-based level
    pub level: u32,
    /// Ordinary items left on this level
    pub remaining: u32,
}

impl GameProgress {
    /// Fresh game.
    pub fn new(lives: u32) -> Self {
        Self { score: 0, high_score: 0, lives, level: 1, remaining: 0 }
    }

    /// Add points, tracking the high score.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    /// Count one ordinary item consumed.
    ///
    /// Returns `true` only on the call that brings the counter to zero; the
    /// counter never goes below zero.
    pub fn consume_ordinary(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

/// Capture animation bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSequence {
    /// Index of the catching pursuer
    pub eater: usize,
    /// Ticks spent in the animation
    pub ticks: u32,
    /// Interpolation step, cycles 0..5
    pub step: u8,
}

// =============================================================================
// WORLD
// =============================================================================

/// Complete simulation state for one level.
#[derive(Clone, Debug)]
pub struct World {
    /// Ticks simulated on this level
    pub tick: u32,

    /// Session seed (for verification)
    pub rng_seed: u64,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// Static obstacle map
    pub grid: Grid,

    /// The player
    pub player: PlayerState,

    /// Pursuers in spawn order
    pub pursuers: Vec<PursuerState>,

    /// Items, compacted after each tick
    pub items: Vec<ItemState>,

    /// Global mode state machine
    pub modes: ModeController,

    /// Active capture animation
    pub capture: Option<CaptureSequence>,

    /// Score, lives, level
    pub progress: GameProgress,

    /// Latched player intent
    pub input: InputLatch,

    /// Set once when the last ordinary item goes
    pub level_complete: bool,

    /// Set once when the last life goes
    pub game_over: bool,

    /// Events generated this tick (cleared each tick)
    pub pending_events: Vec<GameEvent>,
}

impl World {
    /// Build the world for a level.
    ///
    /// `progress` carries score, high score and lives in from the previous
    /// level; its level and item counter are replaced.
    pub fn new(level_data: &LevelData, level: u32, mut progress: GameProgress, config: &SimConfig) -> Self {
        let mut rng = DeterministicRng::for_level(config.seed, level);
        let mut items = Vec::new();
        let mut pursuers = Vec::new();

        for row in 0..level_data.height as i32 {
            for col in 0..level_data.width as i32 {
                let position = FixedVec2::from_tile(TilePos::new(col, row));
                match level_data.cell(col, row) {
                    TileCode::Item(kind) => {
                        items.push(ItemState {
                            id: items.len() as u32,
                            kind,
                            position,
                            active: true,
                        });
                    }
                    TileCode::PursuerSpawn(variant) => {
                        let Ok(id) = u8::try_from(pursuers.len()) else {
                            warn!(level, col, row, "pursuer spawn ignored, id space full");
                            continue;
                        };
                        let facing = Direction::ALL[rng.next_int(4) as usize];
                        pursuers.push(PursuerState::new(id, variant, position, facing, config.speeds.approach));
                    }
                    TileCode::Wall | TileCode::Empty => {}
                }
            }
        }

        progress.level = level;
        progress.remaining = level_data.ordinary_count();

        Self {
            tick: 0,
            rng_seed: config.seed,
            rng,
            grid: Grid::from_level(level_data),
            player: PlayerState::new(FixedVec2::from_tile(level_data.player_spawn)),
            pursuers,
            items,
            modes: ModeController::new(level, config.timings.clone()),
            capture: None,
            progress,
            input: InputLatch::new(),
            level_complete: false,
            game_over: false,
            pending_events: Vec::new(),
        }
    }

    /// Active mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.modes.mode()
    }

    /// Tile of the first living-or-dead variant A pursuer, if the level has one.
    pub fn pink_tile(&self) -> Option<TilePos> {
        self.pursuers
            .iter()
            .find(|p| p.variant == PursuerVariant::Pink)
            .map(|p| p.tile())
    }

    /// Flip every living pursuer (Frightened entry and exit).
    pub fn flip_living(&mut self) {
        for pursuer in self.pursuers.iter_mut().filter(|p| p.alive) {
            pursuer.flip();
        }
    }

    /// Flip every pursuer (Approach/Retreat switch).
    pub fn flip_all(&mut self) {
        for pursuer in &mut self.pursuers {
            pursuer.flip();
        }
    }

    /// Put every mover back on its spawn and clear the input latch.
    pub fn reset_movers(&mut self) {
        self.player.reset();
        for pursuer in &mut self.pursuers {
            pursuer.position = pursuer.spawn;
            pursuer.velocity = FixedVec2::ZERO;
        }
        self.input.reset();
        self.capture = None;
    }

    /// Drop consumed items. Returns how many were removed.
    ///
    /// Items are only flagged inactive during a tick; compaction happens here,
    /// after every pass over the list is finished.
    pub fn sweep(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.active);
        before - self.items.len()
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);

            hasher.update_vec2(self.player.position);
            hasher.update_u8(self.player.facing as u8);
            hasher.update_u8(self.input.hash_byte());

            for pursuer in &self.pursuers {
                hasher.update_u8(pursuer.id);
                hasher.update_u8(pursuer.variant as u8);
                hasher.update_vec2(pursuer.position);
                hasher.update_u8(pursuer.facing as u8);
                hasher.update_fixed(pursuer.speed);
                hasher.update_bool(pursuer.alive);
                hasher.update_bool(pursuer.immune);
                hasher.update_u64(pursuer.respawn_ms as u64);
                hasher.update_tile(pursuer.target);
            }

            for item in &self.items {
                hasher.update_u32(item.id);
                hasher.update_bool(item.active);
            }

            hasher.update_u8(self.modes.mode() as u8);
            hasher.update_u8(self.modes.phase() as u8);
            hasher.update_u64(self.modes.phase_remaining_ms() as u64);
            hasher.update_u64(self.modes.interlude_remaining_ms() as u64);
            match self.capture {
                Some(capture) => {
                    hasher.update_bool(true);
                    hasher.update_u32(capture.eater as u32);
                    hasher.update_u32(capture.ticks);
                    hasher.update_u8(capture.step);
                }
                None => hasher.update_bool(false),
            }

            hasher.update_u32(self.progress.score);
            hasher.update_u32(self.progress.lives);
            hasher.update_u32(self.progress.level);
            hasher.update_u32(self.progress.remaining);
            hasher.update_bool(self.level_complete);
            hasher.update_bool(self.game_over);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
