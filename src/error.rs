//! Centralized error types for the rule engine.
//!
//! Each concern has its own error enum; [`GameError`] aggregates them and is the
//! type returned by public APIs.

use std::io;
use std::path::PathBuf;

use glam::IVec2;

use crate::map::maze::Edge;

/// Main error type for the engine.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Cannot load level: {0}")]
    MalformedLevel(#[from] MalformedLevelError),

    #[error("Cannot load level: {0}")]
    InvalidTeleport(#[from] InvalidTeleportConfigurationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] InvalidConfigurationError),

    #[error("Highscore error: {0}")]
    Highscore(#[from] HighscoreError),

    #[error("Cannot read level file {path}: {source}")]
    LevelFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Level {0} is not configured")]
    LevelNotConfigured(u32),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<figment::Error> for GameError {
    fn from(error: figment::Error) -> Self {
        GameError::Config(Box::new(error))
    }
}

/// A level file whose contents cannot form a tile grid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedLevelError {
    #[error("level contains no rows")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("row {row}, column {column}: '{token}' is not an integer")]
    InvalidToken { row: usize, column: usize, token: String },

    #[error("row {row}, column {column}: unknown tile code {code}")]
    UnknownTileCode { row: usize, column: usize, code: i32 },

    #[error("no player start (7) found")]
    MissingPlayerStart,
}

/// Teleport cells that cannot be paired with an opposite edge.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidTeleportConfigurationError {
    #[error("teleport at {cell} on the {edge} edge has no partner at {expected}")]
    Unpaired { cell: IVec2, edge: Edge, expected: IVec2 },

    #[error("teleport at {cell} is not on a boundary edge")]
    Interior { cell: IVec2 },
}

/// Settings values that were rejected during validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidConfigurationError {
    #[error("tile size {0} must be at least {min} and divisible by {step}", min = crate::constants::MIN_TILE_SIZE, step = crate::constants::TILE_SIZE_STEP)]
    TileSize(u32),

    #[error("resolution {width}x{height} must be non-zero")]
    Dimensions { width: u32, height: u32 },

    #[error("{name} volume {value} must lie within 0.0..=1.0")]
    Volume { name: &'static str, value: f32 },

    #[error("level key {0} is not a number")]
    LevelKey(String),

    #[error("no resolution options configured")]
    NoResolutionOptions,

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Errors raised by the highscore table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HighscoreError {
    #[error("name '{0}' must be 1-3 characters of A-Z or 0-9")]
    InvalidName(String),

    #[error("line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;
