#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bevy_ecs::{entity::Entity, event::Events, world::World};
use glam::IVec2;
use pacman_engine::{
    config::GameplayConfig,
    events::GameEvent,
    game::Game,
    ghost::{GhostStrategy, SteeringContext, StrategyKind},
    map::{direction::Direction, grid::TileGrid, maze::Maze},
    systems::{
        BonusFruit, CurrentLevel, GhostBrain, GhostBundle, GhostMode, Lifecycle, PlayerBundle, PlayerIntent, PlayerLives,
        PowerTimer, ScoreResource,
    },
};

/// A small level with every collectible kind:
///
/// ```text
/// # # # # #
/// # . P . #
/// # o G f #
/// # # # # #
/// ```
pub const SCENARIO: [[i32; 5]; 4] = [[1, 1, 1, 1, 1], [1, 0, 7, 0, 1], [1, -3, 5, -2, 1], [1, 1, 1, 1, 1]];

pub const SCENARIO_START: IVec2 = IVec2::new(2, 1);
pub const SCENARIO_SPAWN: IVec2 = IVec2::new(2, 2);
pub const SCENARIO_POWER_PELLET: IVec2 = IVec2::new(1, 2);
pub const SCENARIO_FRUIT: IVec2 = IVec2::new(3, 2);

pub fn grid(rows: &[&[i32]]) -> TileGrid {
    TileGrid::from_codes(rows).expect("Test grid should be valid")
}

pub fn maze(rows: &[&[i32]]) -> Maze {
    Maze::new(grid(rows)).expect("Test maze should be valid")
}

pub fn scenario_grid() -> TileGrid {
    TileGrid::from_codes(&SCENARIO).expect("Scenario grid should be valid")
}

pub fn scenario_maze() -> Maze {
    Maze::new(scenario_grid()).expect("Scenario maze should be valid")
}

/// Every entity moves on every tick, nothing waits, and no bonus fruit appears.
pub fn fast_gameplay() -> GameplayConfig {
    GameplayConfig {
        frightened_ticks: 10,
        ghost_respawn_ticks: 0,
        player_respawn_ticks: 0,
        player_move_period: 1,
        ghost_move_period: 1,
        frightened_move_period: 1,
        eaten_move_period: 1,
        ghost_strategy: StrategyKind::Patrol,
        bonus_fruit_chance: 0,
        ..GameplayConfig::default()
    }
}

/// A ghost that never moves.
#[derive(Debug, Default, Clone, Copy)]
pub struct Idle;

impl GhostStrategy for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn choose(&mut self, _ctx: &SteeringContext<'_>) -> Option<Direction> {
        None
    }
}

/// A ghost that always tries the same direction, legal or not.
#[derive(Debug, Clone, Copy)]
pub struct Always(pub Direction);

impl GhostStrategy for Always {
    fn name(&self) -> &'static str {
        "always"
    }

    fn choose(&mut self, _ctx: &SteeringContext<'_>) -> Option<Direction> {
        Some(self.0)
    }
}

/// A started game whose ghosts stand still in every mode.
pub fn idle_game(grid: TileGrid, gameplay: GameplayConfig) -> Game {
    let mut game = Game::from_grid(grid, gameplay);
    for mode in [GhostMode::Normal, GhostMode::Frightened, GhostMode::Eaten] {
        game.set_ghost_strategy(mode, Box::new(Idle));
    }
    game.start().expect("Game should start");
    game
}

pub fn idle_scenario_game() -> Game {
    idle_game(scenario_grid(), fast_gameplay())
}

/// Ticks once with the given intent, expecting success.
pub fn step(game: &mut Game, intent: Option<Direction>) {
    game.tick(intent).expect("Tick should succeed");
}

/// A world with every resource the tick systems read, but no entities.
pub fn create_test_world(maze: Maze, gameplay: GameplayConfig) -> World {
    let mut world = World::new();
    world.insert_resource(Events::<GameEvent>::default());
    world.insert_resource(ScoreResource(0));
    world.insert_resource(PlayerLives(gameplay.starting_lives));
    world.insert_resource(PlayerIntent::default());
    world.insert_resource(CurrentLevel(1));
    world.insert_resource(PowerTimer::default());
    world.insert_resource(BonusFruit::new(gameplay.seed));
    world.insert_resource(GhostBrain::new(gameplay.ghost_strategy.build(gameplay.seed)));
    world.insert_resource(gameplay);
    world.insert_resource(maze);
    world
}

pub fn spawn_test_player(world: &mut World, cell: IVec2) -> Entity {
    world.spawn(PlayerBundle::new(cell, Lifecycle::Active)).id()
}

pub fn spawn_test_ghost(world: &mut World, index: usize, cell: IVec2) -> Entity {
    world.spawn(GhostBundle::new(index, cell)).id()
}

pub fn set_intent(world: &mut World, direction: Option<Direction>) {
    world.insert_resource(PlayerIntent(direction));
}

pub fn drain_events(world: &mut World) -> Vec<GameEvent> {
    world.resource_mut::<Events<GameEvent>>().drain().collect()
}

/// Writes a level as CSV, one row per line.
pub fn write_level(dir: &Path, name: &str, rows: &[&[i32]]) -> PathBuf {
    let text = rows
        .iter()
        .map(|row| row.iter().map(i32::to_string).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n");
    let path = dir.join(name);
    fs::write(&path, text).expect("Level file should be written");
    path
}
