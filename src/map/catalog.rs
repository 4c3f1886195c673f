//! The ordered set of levels a game plays through.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{GameError, GameResult};
use crate::map::grid::TileGrid;
use crate::map::maze::Maze;

/// Where a level's tiles come from.
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// A CSV file, read each time the level is entered.
    Path(PathBuf),
    /// An in-memory grid.
    Grid(TileGrid),
}

/// Levels keyed by number. Key `0` is reserved and never played.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: BTreeMap<u32, LevelSource>,
}

impl LevelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding a single in-memory level as level 1.
    pub fn single(grid: TileGrid) -> Self {
        let mut catalog = Self::new();
        catalog.insert(1, LevelSource::Grid(grid));
        catalog
    }

    /// Builds a catalog from numbered level paths.
    pub fn from_paths(paths: impl IntoIterator<Item = (u32, PathBuf)>) -> Self {
        let mut catalog = Self::new();
        for (key, path) in paths {
            catalog.insert(key, LevelSource::Path(path));
        }
        catalog
    }

    /// Adds a level. Key `0` is ignored.
    pub fn insert(&mut self, key: u32, source: LevelSource) {
        if key == 0 {
            warn!("Level key 0 is reserved, ignoring");
            return;
        }
        self.levels.insert(key, source);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn contains(&self, key: u32) -> bool {
        self.levels.contains_key(&key)
    }

    /// The level play starts at: the lowest key ≥ 1.
    pub fn first(&self) -> Option<u32> {
        self.levels.range(1..).next().map(|(&key, _)| key)
    }

    /// The level following `key`, which is always `key + 1` when configured.
    pub fn next_after(&self, key: u32) -> Option<u32> {
        let next = key.checked_add(1)?;
        self.contains(next).then_some(next)
    }

    /// Reads and builds the maze for a level.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::LevelNotConfigured`] for unknown keys, otherwise whatever
    /// loading, parsing or teleport validation reports.
    pub fn load(&self, key: u32) -> GameResult<Maze> {
        let source = self.levels.get(&key).ok_or(GameError::LevelNotConfigured(key))?;
        let grid = match source {
            LevelSource::Path(path) => TileGrid::load(path)?,
            LevelSource::Grid(grid) => grid.clone(),
        };
        let maze = Maze::new(grid)?;
        debug!(level = key, remaining = maze.remaining(), "Level loaded");
        Ok(maze)
    }
}
