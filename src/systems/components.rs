use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::IVec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::ghost::{GhostStrategy, Homing, Retreat};
use crate::map::direction::Direction;
use crate::map::tile::EntityClass;

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// A ghost, identified by its spawn order.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    pub index: usize,
    /// Where the ghost spawns, and where it returns to once eaten.
    pub spawn: IVec2,
}

/// The cell an entity occupies, and the cell it occupied before this tick's move.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub cell: IVec2,
    pub previous: IVec2,
}

impl Position {
    pub fn new(cell: IVec2) -> Self {
        Self { cell, previous: cell }
    }

    /// Marks the start of a tick: the entity has not moved yet.
    pub fn settle(&mut self) {
        self.previous = self.cell;
    }

    pub fn move_to(&mut self, cell: IVec2) {
        self.previous = self.cell;
        self.cell = cell;
    }

    /// Places the entity without recording a move.
    pub fn teleport(&mut self, cell: IVec2) {
        *self = Self::new(cell);
    }

    pub fn moved(&self) -> bool {
        self.cell != self.previous
    }
}

/// The direction an entity last moved in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Facing(pub Direction);

/// The player's pending direction, applied as soon as it becomes legal.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferedDirection(pub Option<Direction>);

/// Counts ticks towards an entity's next move.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stride {
    pub elapsed: u32,
}

impl Stride {
    /// Advances one tick, returning whether the entity moves on this tick.
    pub fn advance(&mut self, period: u32) -> bool {
        self.elapsed += 1;
        if self.elapsed >= period.max(1) {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

/// The ghost state machine.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GhostMode {
    #[default]
    Normal,
    /// Vulnerable after a power pellet; can be eaten by the player.
    Frightened,
    /// Eaten while frightened; returning to its spawn.
    Eaten,
}

/// Whether an entity takes part in the tick, or is waiting out a respawn freeze.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    Respawning {
        remaining_ticks: u32,
    },
}

impl Lifecycle {
    /// A respawn freeze, or [`Lifecycle::Active`] when there is nothing to wait for.
    pub fn respawning(ticks: u32) -> Self {
        if ticks == 0 {
            Lifecycle::Active
        } else {
            Lifecycle::Respawning { remaining_ticks: ticks }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    /// Advances the freeze by one tick, returning true when it just ended.
    pub fn tick(&mut self) -> bool {
        match self {
            Lifecycle::Active => false,
            Lifecycle::Respawning { remaining_ticks } => {
                *remaining_ticks = remaining_ticks.saturating_sub(1);
                if *remaining_ticks == 0 {
                    *self = Lifecycle::Active;
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub class: EntityClass,
    pub position: Position,
    pub facing: Facing,
    pub buffered_direction: BufferedDirection,
    pub stride: Stride,
    pub lifecycle: Lifecycle,
}

impl PlayerBundle {
    pub fn new(start: IVec2, lifecycle: Lifecycle) -> Self {
        Self {
            player: PlayerControlled,
            class: EntityClass::Player,
            position: Position::new(start),
            facing: Facing::default(),
            buffered_direction: BufferedDirection::default(),
            stride: Stride::default(),
            lifecycle,
        }
    }
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub class: EntityClass,
    pub position: Position,
    pub facing: Facing,
    pub stride: Stride,
    pub mode: GhostMode,
    pub lifecycle: Lifecycle,
}

impl GhostBundle {
    pub fn new(index: usize, spawn: IVec2) -> Self {
        Self {
            ghost: Ghost { index, spawn },
            class: EntityClass::Ghost,
            position: Position::new(spawn),
            facing: Facing::default(),
            stride: Stride::default(),
            mode: GhostMode::Normal,
            lifecycle: Lifecycle::Active,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreResource(pub u32);

/// A resource to store the number of player lives.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLives(pub u8);

impl Default for PlayerLives {
    fn default() -> Self {
        Self(crate::constants::STARTING_LIVES)
    }
}

/// The movement intent for the current tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerIntent(pub Option<Direction>);

/// The level currently being played.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentLevel(pub u32);

/// Ticks left on the frightened countdown. Zero means no ghost is frightened by it.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerTimer {
    pub remaining_ticks: u32,
}

/// Bonus fruit spawning state for the whole game.
#[derive(Resource, Debug, Clone)]
pub struct BonusFruit {
    pub rng: SmallRng,
    pub placed: u32,
}

impl BonusFruit {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            placed: 0,
        }
    }
}

/// The score to beat, and whether it has been beaten this game.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighscoreTarget {
    pub score: Option<u32>,
    pub beaten: bool,
}

/// The steering strategy used for each ghost mode.
#[derive(Resource)]
pub struct GhostBrain {
    pub normal: Box<dyn GhostStrategy>,
    pub frightened: Box<dyn GhostStrategy>,
    pub eaten: Box<dyn GhostStrategy>,
}

impl GhostBrain {
    /// Uses `normal` for Normal mode, with the built-in frightened and eaten steering.
    pub fn new(normal: Box<dyn GhostStrategy>) -> Self {
        Self {
            normal,
            frightened: Box::new(Retreat),
            eaten: Box::new(Homing),
        }
    }

    pub fn for_mode(&mut self, mode: GhostMode) -> &mut dyn GhostStrategy {
        match mode {
            GhostMode::Normal => self.normal.as_mut(),
            GhostMode::Frightened => self.frightened.as_mut(),
            GhostMode::Eaten => self.eaten.as_mut(),
        }
    }

    pub fn set(&mut self, mode: GhostMode, strategy: Box<dyn GhostStrategy>) {
        match mode {
            GhostMode::Normal => self.normal = strategy,
            GhostMode::Frightened => self.frightened = strategy,
            GhostMode::Eaten => self.eaten = strategy,
        }
    }
}
