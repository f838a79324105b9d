//! Static Tile Grid
//!
//! Obstacle lookup built once per level and never mutated afterward.

use crate::game::level::LevelData;

/// Obstacle map addressed by (column, row).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    obstacles: Vec<bool>,
}

impl Grid {
    /// Build from decoded level data.
    pub fn from_level(level: &LevelData) -> Self {
        let mut obstacles = Vec::with_capacity((level.width * level.height) as usize);
        for row in 0..level.height as i32 {
            for col in 0..level.width as i32 {
                obstacles.push(level.cell(col, row).is_obstacle());
            }
        }
        Self { width: level.width, height: level.height, obstacles }
    }

    /// Columns
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Rows
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Is the tile impassable? Anything outside the grid is.
    #[inline]
    pub fn is_obstacle(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return true;
        }
        self.obstacles
            .get((row as u32 * self.width + col as u32) as usize)
            .copied()
            .unwrap_or(true)
    }

    /// Row-major obstacle flags for rendering the background.
    pub fn walls(&self) -> &[bool] {
        &self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::TilePos;
    use crate::game::level::TileCode;
    use proptest::prelude::*;

    fn small() -> Grid {
        let level = LevelData::parse_sized("0 0\n.X.\n...", 3, 2).unwrap();
        Grid::from_level(&level)
    }

    #[test]
    fn test_inside_lookup() {
        let grid = small();
        assert!(!grid.is_obstacle(0, 0));
        assert!(grid.is_obstacle(1, 0));
        assert!(!grid.is_obstacle(2, 1));
        assert_eq!(grid.walls().iter().filter(|w| **w).count(), 1);
    }

    #[test]
    fn test_short_cell_list_is_open() {
        let level = LevelData {
            width: 3,
            height: 2,
            cells: vec![TileCode::Wall],
            player_spawn: TilePos::new(1, 1),
        };
        let grid = Grid::from_level(&level);
        assert_eq!(grid.walls().len(), 6);
        assert!(grid.is_obstacle(0, 0));
        assert!(!grid.is_obstacle(2, 1));
        assert!(grid.is_obstacle(3, 1));
    }

    proptest! {
        #[test]
        fn prop_outside_is_obstacle(col in -100i32..100, row in -100i32..100) {
            let grid = small();
            prop_assume!(col < 0 || row < 0 || col >= 3 || row >= 2);
            prop_assert!(grid.is_obstacle(col, row));
        }
    }
}
