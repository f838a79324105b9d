//! Level Data
//!
//! Decoded level layout handed to the simulation at load time, a reference
//! text decoder for the bundled `.lvl` format, and the [`LevelSource`] seam the
//! session pulls levels through.
//!
//! ## Text Format
//!
//! ```text
//! 1 1                  <- player spawn "col row"
//! XXXXXXXXXXXXXXXXXXXX <- one row per line, one char per cell
//! X.....F.....B......X
//! ...
//! ```
//!
//! | Char | Cell |
//! |------|------|
//! | `X` | wall |
//! | `.` | ordinary item |
//! | `F` | mode trigger |
//! | `B` / `C` / `S` | bonus A / B / C |
//! | `P` / `V` / `R` / `Y` | pursuer spawn, variant A / B / C / D |
//! | `Q` | empty, no item |
//!
//! Anything else, and any cell missing from a short row or a missing row,
//! decodes to empty.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec2::TilePos;
use crate::game::state::{ItemKind, PursuerVariant};

/// Reference grid width.
pub const DEFAULT_WIDTH: u32 = 20;

/// Reference grid height.
pub const DEFAULT_HEIGHT: u32 = 20;

// =============================================================================
// TILE CODES
// =============================================================================

/// Decoded content of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileCode {
    /// Obstacle
    Wall,
    /// Passable, carries an item
    Item(ItemKind),
    /// Passable, a pursuer spawns here
    PursuerSpawn(PursuerVariant),
    /// Passable, nothing on it
    Empty,
}

impl TileCode {
    /// Decode one level character.
    pub fn from_char(c: char) -> Self {
        match c {
            'X' => TileCode::Wall,
            '.' => TileCode::Item(ItemKind::Ordinary),
            'F' => TileCode::Item(ItemKind::ModeTrigger),
            'B' => TileCode::Item(ItemKind::BonusA),
            'C' => TileCode::Item(ItemKind::BonusB),
            'S' => TileCode::Item(ItemKind::BonusC),
            'P' => TileCode::PursuerSpawn(PursuerVariant::Pink),
            'V' => TileCode::PursuerSpawn(PursuerVariant::Purple),
            'R' => TileCode::PursuerSpawn(PursuerVariant::Red),
            'Y' => TileCode::PursuerSpawn(PursuerVariant::Yellow),
            _ => TileCode::Empty,
        }
    }

    /// Is this cell an obstacle?
    #[inline]
    pub fn is_obstacle(self) -> bool {
        matches!(self, TileCode::Wall)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Level decode and lookup failures.
///
/// Cell content never fails to decode; only the header and the grid shape can.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// Text had no spawn line.
    #[error("level has no spawn header")]
    MissingHeader,
    /// Spawn line was not two integers.
    #[error("invalid spawn header: {0:?}")]
    InvalidSpawn(String),
    /// Spawn coordinates fall outside the grid.
    #[error("spawn ({col}, {row}) outside {width}x{height} grid")]
    SpawnOutOfBounds {
        /// Spawn column
        col: i32,
        /// Spawn row
        row: i32,
        /// Grid width
        width: u32,
        /// Grid height
        height: u32,
    },
    /// Width or height was zero.
    #[error("level grid must be non-empty")]
    EmptyGrid,
    /// Requested level number does not exist.
    #[error("no level {0}")]
    Missing(u32),
}

// =============================================================================
// LEVEL DATA
// =============================================================================

/// A fully decoded level: cell codes plus the player spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    /// Columns
    pub width: u32,
    /// Rows
    pub height: u32,
    /// Row-major cell codes, `width * height` long; missing cells read as empty
    pub cells: Vec<TileCode>,
    /// Player spawn tile
    pub player_spawn: TilePos,
}

impl LevelData {
    /// Decode a reference-size (20x20) level.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        Self::parse_sized(text, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Decode a level of the given dimensions.
    pub fn parse_sized(text: &str, width: u32, height: u32) -> Result<Self, LevelError> {
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut lines = text.lines();
        let header = lines
            .next()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(LevelError::MissingHeader)?;
        let player_spawn = parse_spawn(header)?;

        if player_spawn.col < 0
            || player_spawn.row < 0
            || player_spawn.col >= width as i32
            || player_spawn.row >= height as i32
        {
            return Err(LevelError::SpawnOutOfBounds {
                col: player_spawn.col,
                row: player_spawn.row,
                width,
                height,
            });
        }

        let mut cells = vec![TileCode::Empty; (width * height) as usize];
        for (row, line) in lines.take(height as usize).enumerate() {
            for (col, c) in line.trim_end_matches('\r').chars().take(width as usize).enumerate() {
                cells[row * width as usize + col] = TileCode::from_char(c);
            }
        }

        // Nothing sits under the player at spawn.
        let spawn_index = (player_spawn.row as u32 * width + player_spawn.col as u32) as usize;
        cells[spawn_index] = TileCode::Empty;

        Ok(Self { width, height, cells, player_spawn })
    }

    /// Cell code at a tile; out-of-range reads as wall, a missing cell as empty.
    pub fn cell(&self, col: i32, row: i32) -> TileCode {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return TileCode::Wall;
        }
        self.cells
            .get((row as u32 * self.width + col as u32) as usize)
            .copied()
            .unwrap_or(TileCode::Empty)
    }

    /// Number of ordinary items, the level-complete counter's start value.
    pub fn ordinary_count(&self) -> u32 {
        self.cells
            .iter()
            .filter(|c| matches!(c, TileCode::Item(ItemKind::Ordinary)))
            .count() as u32
    }
}

fn parse_spawn(header: &str) -> Result<TilePos, LevelError> {
    let invalid = || LevelError::InvalidSpawn(header.to_string());
    let mut parts = header.split_whitespace();
    let col = parts.next().and_then(|p| p.parse::<i32>().ok()).ok_or_else(invalid)?;
    let row = parts.next().and_then(|p| p.parse::<i32>().ok()).ok_or_else(invalid)?;
    Ok(TilePos::new(col, row))
}

// =============================================================================
// LEVEL SOURCES
// =============================================================================

/// Supplies decoded levels by 1-based level number.
pub trait LevelSource {
    /// Number of levels; the session is won after the last one.
    fn level_count(&self) -> u32;

    /// Decode level `number` (1-based).
    fn level(&self, number: u32) -> Result<LevelData, LevelError>;
}

const EMBEDDED: [&str; 3] = [
    include_str!("../../levels/1.lvl"),
    include_str!("../../levels/2.lvl"),
    include_str!("../../levels/3.lvl"),
];

/// Levels compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLevels;

impl LevelSource for EmbeddedLevels {
    fn level_count(&self) -> u32 {
        EMBEDDED.len() as u32
    }

    fn level(&self, number: u32) -> Result<LevelData, LevelError> {
        let text = number
            .checked_sub(1)
            .and_then(|i| EMBEDDED.get(i as usize))
            .ok_or(LevelError::Missing(number))?;
        LevelData::parse(text)
    }
}

/// Levels held as text, decoded on demand.
#[derive(Debug, Clone, Default)]
pub struct TextLevels {
    texts: Vec<String>,
    width: u32,
    height: u32,
}

impl TextLevels {
    /// Reference-size levels.
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts, width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT }
    }

    /// Levels of a custom size.
    pub fn sized(texts: Vec<String>, width: u32, height: u32) -> Self {
        Self { texts, width, height }
    }
}

impl LevelSource for TextLevels {
    fn level_count(&self) -> u32 {
        self.texts.len() as u32
    }

    fn level(&self, number: u32) -> Result<LevelData, LevelError> {
        let text = number
            .checked_sub(1)
            .and_then(|i| self.texts.get(i as usize))
            .ok_or(LevelError::Missing(number))?;
        LevelData::parse_sized(text, self.width, self.height)
    }
}

// =============================================================================
// TESTS
// =============================================================================
