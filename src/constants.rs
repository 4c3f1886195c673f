//! This module contains all the constants used in the game.

/// Default simulation rate, in ticks per second.
pub const TICK_RATE: u32 = 30;

/// Score values awarded by the rule engine.
pub mod score {
    /// A regular pellet.
    pub const PELLET: u32 = 10;
    /// Power pellets frighten ghosts but award nothing themselves.
    pub const POWER_PELLET: u32 = 0;
    /// A fruit, whether placed by the level author or spawned as a bonus.
    pub const FRUIT: u32 = 100;
    /// Eating a frightened ghost.
    pub const GHOST: u32 = 200;
}

/// Tick-counted durations, assuming [`TICK_RATE`].
pub mod timing {
    use super::TICK_RATE;

    /// How long ghosts stay frightened after a power pellet (5 seconds).
    pub const FRIGHTENED_TICKS: u32 = 5 * TICK_RATE;
    /// How long an eaten ghost waits at its spawn before moving again (3 seconds).
    pub const GHOST_RESPAWN_TICKS: u32 = 3 * TICK_RATE;
    /// How long the player is frozen after dying or starting a level (3 seconds).
    pub const PLAYER_RESPAWN_TICKS: u32 = 3 * TICK_RATE;
}

/// Default movement cadence, in ticks per cell.
pub mod cadence {
    pub const PLAYER: u32 = 4;
    pub const GHOST: u32 = 5;
    pub const FRIGHTENED_GHOST: u32 = 10;
    pub const EATEN_GHOST: u32 = 2;
}

/// Number of lives the player starts with.
pub const STARTING_LIVES: u8 = 3;

/// Bonus fruit spawning: at most this many per game...
pub const BONUS_FRUIT_LIMIT: u32 = 2;
/// ...each tick with a 1-in-N chance.
pub const BONUS_FRUIT_CHANCE: u32 = 200;

/// The smallest tile size a resolution may use, in pixels.
pub const MIN_TILE_SIZE: u32 = 10;
/// Tile sizes must be a multiple of this.
pub const TILE_SIZE_STEP: u32 = 5;

/// Number of entries kept in the highscore table.
pub const HIGHSCORE_SLOTS: usize = 5;
/// Maximum length of a highscore name.
pub const HIGHSCORE_NAME_LEN: usize = 3;
/// The table written when no highscore file exists yet.
pub const DEFAULT_HIGHSCORES: [(&str, u32); 3] = [("AAA", 1500), ("BBB", 1200), ("CCC", 900)];
