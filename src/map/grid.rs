//! Level parsing: converts CSV tile codes into an immutable [`TileGrid`].

use std::fs;
use std::path::Path;

use glam::{IVec2, UVec2};
use tracing::{debug, trace};

use crate::error::{GameError, GameResult, MalformedLevelError};
use crate::map::tile::TileKind;

/// A rectangular, immutable matrix of decoded tiles, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    tiles: Vec<TileKind>,
    size: UVec2,
    /// The first player start in row-major order.
    player_start: IVec2,
}

impl TileGrid {
    /// Reads and parses a CSV level file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::LevelFile`] if the file cannot be read, or
    /// [`GameError::MalformedLevel`] if its contents are not a valid grid.
    pub fn load(path: impl AsRef<Path>) -> GameResult<TileGrid> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GameError::LevelFile {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::parse(&text)?;
        debug!(path = %path.display(), columns = grid.size.x, rows = grid.size.y, "Level file parsed");
        Ok(grid)
    }

    /// Parses comma-separated rows of tile codes. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Fails on ragged rows, non-numeric tokens, unknown codes, or a missing player start.
    pub fn parse(text: &str) -> Result<TileGrid, MalformedLevelError> {
        let mut rows = Vec::new();
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let row = rows.len();
            let codes = line
                .split(',')
                .enumerate()
                .map(|(column, token)| {
                    let token = token.trim();
                    token.parse::<i32>().map_err(|_| MalformedLevelError::InvalidToken {
                        row,
                        column,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(codes);
        }
        Self::from_codes(&rows)
    }

    /// Builds a grid from already-split rows of codes.
    pub fn from_codes<R: AsRef<[i32]>>(rows: &[R]) -> Result<TileGrid, MalformedLevelError> {
        let width = rows.first().map(|row| row.as_ref().len()).ok_or(MalformedLevelError::Empty)?;
        if width == 0 {
            return Err(MalformedLevelError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, codes) in rows.iter().enumerate() {
            let codes = codes.as_ref();
            if codes.len() != width {
                return Err(MalformedLevelError::RaggedRow {
                    row,
                    expected: width,
                    found: codes.len(),
                });
            }
            for (column, &code) in codes.iter().enumerate() {
                let tile = TileKind::from_code(code).ok_or(MalformedLevelError::UnknownTileCode { row, column, code })?;
                tiles.push(tile);
            }
        }

        let start = tiles
            .iter()
            .position(|&tile| tile == TileKind::PlayerStart)
            .ok_or(MalformedLevelError::MissingPlayerStart)?;
        let player_start = IVec2::new((start % width) as i32, (start / width) as i32);

        trace!(columns = width, rows = rows.len(), start = %player_start, "Tile grid decoded");
        Ok(TileGrid {
            tiles,
            size: UVec2::new(width as u32, rows.len() as u32),
            player_start,
        })
    }

    /// The grid size, as (columns, rows).
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn player_start(&self) -> IVec2 {
        self.player_start
    }

    pub fn columns(&self) -> i32 {
        self.size.x as i32
    }

    pub fn rows(&self) -> i32 {
        self.size.y as i32
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.columns() && cell.y < self.rows()
    }

    /// Returns the tile at `cell`, or `None` when out of bounds.
    pub fn get(&self, cell: IVec2) -> Option<TileKind> {
        self.contains(cell)
            .then(|| self.tiles[(cell.y * self.columns() + cell.x) as usize])
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (IVec2, TileKind)> + '_ {
        let columns = self.columns();
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &tile)| (IVec2::new(i as i32 % columns, i as i32 / columns), tile))
    }

    /// Iterates the cells holding a given tile kind, in row-major order.
    pub fn find(&self, kind: TileKind) -> impl Iterator<Item = IVec2> + '_ {
        self.cells().filter(move |(_, tile)| *tile == kind).map(|(cell, _)| cell)
    }
}
