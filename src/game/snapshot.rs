//! Render Snapshot
//!
//! Read-only view of a world handed to the presentation layer between ticks.
//! Positions are converted to float pixels here; nothing flows back.

use serde::{Serialize, Deserialize};

use crate::game::mode::Mode;
use crate::game::state::{Direction, ItemKind, PursuerVariant, World};

/// Player as drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Left, pixels
    pub x: f32,
    /// Top, pixels
    pub y: f32,
    /// Sprite direction
    pub facing: Direction,
}

/// Pursuer as drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PursuerView {
    /// Spawn-order index
    pub id: u8,
    /// Variant (sprite colour)
    pub variant: PursuerVariant,
    /// Left, pixels
    pub x: f32,
    /// Top, pixels
    pub y: f32,
    /// Sprite direction
    pub facing: Direction,
    /// False while eaten (eyes only)
    pub alive: bool,
    /// Edible right now (blue sprite)
    pub vulnerable: bool,
}

/// Item as drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    /// Stable id
    pub id: u32,
    /// Category
    pub kind: ItemKind,
    /// Tile column
    pub col: i32,
    /// Tile row
    pub row: i32,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Ticks simulated on this level
    pub tick: u32,
    /// Grid columns
    pub width: u32,
    /// Grid rows
    pub height: u32,
    /// Row-major wall flags for the background
    pub walls: Vec<bool>,
    /// The player
    pub player: PlayerView,
    /// Pursuers in spawn order
    pub pursuers: Vec<PursuerView>,
    /// Items still on the board
    pub items: Vec<ItemView>,
    /// Global mode
    pub mode: Mode,
    /// Score
    pub score: u32,
    /// Best score this session
    pub high_score: u32,
    /// Lives left
    pub lives: u32,
    /// 1-based level
    pub level: u32,
    /// Ordinary items left
    pub remaining: u32,
}

impl World {
    /// Capture a render snapshot.
    pub fn snapshot(&self) -> RenderSnapshot {
        let frightened = self.modes.is_frightened();
        let (px, py) = self.player.position.to_floats();

        RenderSnapshot {
            tick: self.tick,
            width: self.grid.width(),
            height: self.grid.height(),
            walls: self.grid.walls().to_vec(),
            player: PlayerView { x: px, y: py, facing: self.player.facing },
            pursuers: self
                .pursuers
                .iter()
                .map(|p| {
                    let (x, y) = p.position.to_floats();
                    PursuerView {
                        id: p.id,
                        variant: p.variant,
                        x,
                        y,
                        facing: p.facing,
                        alive: p.alive,
                        vulnerable: frightened && p.alive && !p.immune,
                    }
                })
                .collect(),
            items: self
                .items
                .iter()
                .filter(|i| i.active)
                .map(|i| {
                    let tile = i.position.tile();
                    ItemView { id: i.id, kind: i.kind, col: tile.col, row: tile.row }
                })
                .collect(),
            mode: self.mode(),
            score: self.progress.score,
            high_score: self.progress.high_score,
            lives: self.progress.lives,
            level: self.progress.level,
            remaining: self.progress.remaining,
        }
    }
}
