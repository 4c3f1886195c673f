//! Tile codes and the static rules attached to each tile kind.

use bevy_ecs::component::Component;
use bitflags::bitflags;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

bitflags! {
    /// Which entity classes may stand on a tile.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TraversalFlags: u8 {
        const PLAYER = 1 << 0;
        const GHOST = 1 << 1;
    }
}

/// The class of a moving entity, deciding which tiles it may enter.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Player,
    Ghost,
}

impl EntityClass {
    /// Returns the traversal flag this class requires of a tile.
    pub fn traversal_flags(self) -> TraversalFlags {
        match self {
            EntityClass::Player => TraversalFlags::PLAYER,
            EntityClass::Ghost => TraversalFlags::GHOST,
        }
    }
}

/// Something the player can eat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Collectible {
    Pellet,
    PowerPellet,
    Fruit,
}

impl Collectible {
    pub fn score_value(self) -> u32 {
        match self {
            Collectible::Pellet => crate::constants::score::PELLET,
            Collectible::PowerPellet => crate::constants::score::POWER_PELLET,
            Collectible::Fruit => crate::constants::score::FRUIT,
        }
    }
}

/// An enum representing the different types of tiles on the map.
///
/// Decoded once from the numeric level codes; nothing downstream looks at the raw integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum TileKind {
    /// Open floor without a collectible (`-1`).
    Empty,
    /// Blocks every entity (`1`).
    Wall,
    /// A regular pellet (`0`).
    Pellet,
    /// A power pellet (`-3`).
    PowerPellet,
    /// A fruit placed by the level author (`-2`).
    Fruit,
    /// Ghost house door, open to ghosts only (`2`).
    Door,
    /// Where a ghost is spawned (`5`).
    GhostSpawn,
    /// Where the player is spawned (`7`).
    PlayerStart,
    /// A boundary cell wrapping to the opposite edge (`3`).
    Teleport,
}

impl TileKind {
    /// Decodes a numeric level code, returning `None` for unknown codes.
    pub const fn from_code(code: i32) -> Option<TileKind> {
        match code {
            -1 => Some(TileKind::Empty),
            1 => Some(TileKind::Wall),
            0 => Some(TileKind::Pellet),
            -3 => Some(TileKind::PowerPellet),
            -2 => Some(TileKind::Fruit),
            2 => Some(TileKind::Door),
            5 => Some(TileKind::GhostSpawn),
            7 => Some(TileKind::PlayerStart),
            3 => Some(TileKind::Teleport),
            _ => None,
        }
    }

    /// The numeric code this tile is written as in level files.
    pub const fn code(self) -> i32 {
        match self {
            TileKind::Empty => -1,
            TileKind::Wall => 1,
            TileKind::Pellet => 0,
            TileKind::PowerPellet => -3,
            TileKind::Fruit => -2,
            TileKind::Door => 2,
            TileKind::GhostSpawn => 5,
            TileKind::PlayerStart => 7,
            TileKind::Teleport => 3,
        }
    }

    pub fn traversal_flags(self) -> TraversalFlags {
        match self {
            TileKind::Wall => TraversalFlags::empty(),
            TileKind::Door => TraversalFlags::GHOST,
            _ => TraversalFlags::all(),
        }
    }

    /// The collectible a level starts with on this tile, if any.
    pub fn collectible(self) -> Option<Collectible> {
        match self {
            TileKind::Pellet => Some(Collectible::Pellet),
            TileKind::PowerPellet => Some(Collectible::PowerPellet),
            TileKind::Fruit => Some(Collectible::Fruit),
            _ => None,
        }
    }
}
