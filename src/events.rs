use bevy_ecs::prelude::*;
use glam::IVec2;

use crate::map::tile::Collectible;

/// Gameplay notifications, collected after every tick for presentation layers.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CollectibleConsumed { cell: IVec2, kind: Collectible },
    /// A power pellet was eaten and Normal ghosts turned Frightened.
    GhostsFrightened,
    /// The frightened countdown expired.
    FrightenedEnded,
    GhostEaten { cell: IVec2 },
    PlayerCaught { lives_left: u8 },
    BonusFruitPlaced { cell: IVec2 },
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    GameOver,
    GameComplete,
    HighscoreBeaten { score: u32 },
}
