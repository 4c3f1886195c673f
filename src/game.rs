//! This module contains the level controller: the ECS world, its schedule and level transitions.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::Events;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule};
use bevy_ecs::world::World;
use glam::IVec2;
use tracing::{debug, error, info};

use crate::config::{Config, GameplayConfig};
use crate::error::{GameError, GameResult};
use crate::events::GameEvent;
use crate::formatter;
use crate::ghost::GhostStrategy;
use crate::map::catalog::LevelCatalog;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::map::maze::Maze;
use crate::systems::{
    bonus_fruit_system, collision_system, ghost_movement_system, highscore_watch_system, is_playing, item_system,
    player_is_active, player_movement_system, power_timer_system, progress_system, respawn_system, BonusFruit,
    CurrentLevel, Facing, GameStage, Ghost, GhostBrain, GhostBundle, GhostMode, HighscoreTarget, Lifecycle, PlayerBundle,
    PlayerIntent, PlayerLives, Position, PowerTimer, ScoreResource,
};

/// A read-only snapshot of one ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostView {
    pub index: usize,
    pub cell: IVec2,
    pub spawn: IVec2,
    pub facing: Direction,
    pub mode: GhostMode,
    pub lifecycle: Lifecycle,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// The `World` holds the maze, entities and scoring resources; the `Schedule` runs one
/// tick of rules. Level loading and stage changes that replace the maze happen here,
/// between schedule runs.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    catalog: LevelCatalog,
    player: Option<Entity>,
    ghosts: Vec<Entity>,
    /// Set once the Normal-mode steering has been replaced through [`Game::set_ghost_strategy`].
    custom_normal_strategy: bool,
    /// Events raised during the most recent tick.
    events: Vec<GameEvent>,
}

impl Game {
    /// Creates a game over the given levels. Nothing is loaded until [`Game::start`] or the first tick.
    pub fn new(catalog: LevelCatalog, gameplay: GameplayConfig) -> Game {
        let mut world = World::default();
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        Self::insert_resources(&mut world, gameplay);
        Self::configure_schedule(&mut schedule);

        Game {
            world,
            schedule,
            catalog,
            player: None,
            ghosts: Vec::new(),
            custom_normal_strategy: false,
            events: Vec::new(),
        }
    }

    /// A game with a single in-memory level.
    pub fn from_grid(grid: TileGrid, gameplay: GameplayConfig) -> Game {
        Self::new(LevelCatalog::single(grid), gameplay)
    }

    pub fn from_config(config: &Config) -> Game {
        Self::new(config.catalog(), config.gameplay.clone())
    }

    fn insert_resources(world: &mut World, gameplay: GameplayConfig) {
        world.insert_resource(Events::<GameEvent>::default());
        world.insert_resource(GameStage::Loading);
        world.insert_resource(ScoreResource(0));
        world.insert_resource(PlayerLives(gameplay.starting_lives));
        world.insert_resource(PlayerIntent::default());
        world.insert_resource(CurrentLevel::default());
        world.insert_resource(PowerTimer::default());
        world.insert_resource(BonusFruit::new(gameplay.seed));
        world.insert_resource(HighscoreTarget::default());
        world.insert_resource(GhostBrain::new(gameplay.ghost_strategy.build(gameplay.seed)));
        world.insert_resource(gameplay);
    }

    fn configure_schedule(schedule: &mut Schedule) {
        let active_systems = (
            power_timer_system,
            player_movement_system,
            item_system,
            ghost_movement_system,
            collision_system,
            bonus_fruit_system,
        )
            .chain()
            .run_if(player_is_active);

        schedule.add_systems(
            (respawn_system, active_systems, highscore_watch_system, progress_system)
                .chain()
                .run_if(is_playing),
        );
    }

    /// Loads the first level and begins play.
    ///
    /// # Errors
    ///
    /// Fails, leaving the game [`GameStage::Halted`], if no level is configured or the
    /// first level cannot be loaded.
    pub fn start(&mut self) -> GameResult<()> {
        let Some(first) = self.catalog.first() else {
            self.set_stage(GameStage::Halted);
            return Err(GameError::InvalidState("no levels configured".to_string()));
        };
        info!(level = first, levels = self.catalog.len(), "Starting game");
        self.enter_level(first)
    }

    /// Resets score, lives and the seeded generators, then starts again from the first level.
    ///
    /// Normal-mode steering built from the configuration is rebuilt from the seed; a
    /// strategy installed with [`Game::set_ghost_strategy`] is kept as is.
    pub fn restart(&mut self) -> GameResult<()> {
        let gameplay = self.gameplay().clone();
        self.world.insert_resource(ScoreResource(0));
        self.world.insert_resource(PlayerLives(gameplay.starting_lives));
        self.world.insert_resource(BonusFruit::new(gameplay.seed));
        if !self.custom_normal_strategy {
            self.world.resource_mut::<GhostBrain>().normal = gameplay.ghost_strategy.build(gameplay.seed);
        }
        self.world.resource_mut::<HighscoreTarget>().beaten = false;
        self.world.resource_mut::<Events<GameEvent>>().clear();
        self.events.clear();
        info!("Restarting game");
        self.start()
    }

    /// Advances the game by one tick with the given movement intent.
    ///
    /// A cleared level is replaced by the next one on the tick after it was cleared.
    ///
    /// # Errors
    ///
    /// Returns the load error when the next level cannot be read or built; the game is
    /// then [`GameStage::Halted`] and further ticks do nothing.
    pub fn tick(&mut self, intent: Option<Direction>) -> GameResult<()> {
        self.events.clear();
        formatter::increment_tick();

        match self.stage() {
            GameStage::Loading => return self.start(),
            GameStage::LevelComplete => return self.advance_level(),
            GameStage::Playing => {}
            GameStage::GameOver | GameStage::GameComplete | GameStage::Halted => return Ok(()),
        }

        self.world.insert_resource(PlayerIntent(intent));
        self.schedule.run(&mut self.world);
        self.collect_events();
        Ok(())
    }

    fn advance_level(&mut self) -> GameResult<()> {
        let current = self.level();
        let Some(next) = self.catalog.next_after(current) else {
            info!(level = current, score = self.score(), "Final level cleared");
            self.set_stage(GameStage::GameComplete);
            self.events.push(GameEvent::GameComplete);
            return Ok(());
        };

        self.enter_level(next)?;
        if self.gameplay().extra_life_per_level {
            let mut lives = self.world.resource_mut::<PlayerLives>();
            lives.0 = lives.0.saturating_add(1);
            debug!(lives = lives.0, "Extra life for reaching the next level");
        }
        Ok(())
    }

    fn enter_level(&mut self, level: u32) -> GameResult<()> {
        self.set_stage(GameStage::Loading);
        match self.catalog.load(level) {
            Ok(maze) => {
                self.install_level(level, maze);
                Ok(())
            }
            Err(e) => {
                error!(level, error = %e, "Level failed to load, halting");
                self.set_stage(GameStage::Halted);
                Err(e)
            }
        }
    }

    /// Replaces the maze and ghosts, and puts the player back on the start cell.
    fn install_level(&mut self, level: u32, maze: Maze) {
        for ghost in self.ghosts.drain(..) {
            self.world.despawn(ghost);
        }

        let start = maze.player_start();
        let spawns = maze.ghost_spawns().to_vec();
        let freeze = Lifecycle::respawning(self.gameplay().player_respawn_ticks);

        self.world.insert_resource(maze);
        self.world.insert_resource(PowerTimer::default());
        self.world.insert_resource(CurrentLevel(level));

        let player = match self.player {
            Some(entity) => {
                self.world.entity_mut(entity).insert(PlayerBundle::new(start, freeze));
                entity
            }
            None => self.world.spawn(PlayerBundle::new(start, freeze)).id(),
        };
        self.player = Some(player);

        self.ghosts = spawns
            .iter()
            .enumerate()
            .map(|(index, &spawn)| self.world.spawn(GhostBundle::new(index, spawn)).id())
            .collect();

        info!(level, %start, ghosts = self.ghosts.len(), "Level started");
        self.set_stage(GameStage::Playing);
        self.events.push(GameEvent::LevelStarted { level });
    }

    fn collect_events(&mut self) {
        let mut events = self.world.resource_mut::<Events<GameEvent>>();
        self.events.extend(events.drain());
    }

    fn set_stage(&mut self, stage: GameStage) {
        let mut current = self.world.resource_mut::<GameStage>();
        if *current != stage {
            debug!(from = ?*current, to = ?stage, "Stage transition");
            *current = stage;
        }
    }

    /// The score the game must pass to raise [`GameEvent::HighscoreBeaten`].
    pub fn set_highscore_target(&mut self, score: Option<u32>) {
        self.world.insert_resource(HighscoreTarget { score, beaten: false });
    }

    /// Replaces the steering used for ghosts in `mode`.
    pub fn set_ghost_strategy(&mut self, mode: GhostMode, strategy: Box<dyn GhostStrategy>) {
        if mode == GhostMode::Normal {
            self.custom_normal_strategy = true;
        }
        self.world.resource_mut::<GhostBrain>().set(mode, strategy);
    }

    pub fn stage(&self) -> GameStage {
        *self.world.resource::<GameStage>()
    }

    pub fn score(&self) -> u32 {
        self.world.resource::<ScoreResource>().0
    }

    pub fn lives(&self) -> u8 {
        self.world.resource::<PlayerLives>().0
    }

    /// The current level number; 0 before the first level loads.
    pub fn level(&self) -> u32 {
        self.world.resource::<CurrentLevel>().0
    }

    pub fn gameplay(&self) -> &GameplayConfig {
        self.world.resource::<GameplayConfig>()
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// The current maze, once a level has loaded.
    pub fn maze(&self) -> Option<&Maze> {
        self.world.get_resource::<Maze>()
    }

    /// Collectibles left in the current level.
    pub fn remaining(&self) -> usize {
        self.maze().map_or(0, Maze::remaining)
    }

    pub fn frightened_ticks_remaining(&self) -> u32 {
        self.world.resource::<PowerTimer>().remaining_ticks
    }

    pub fn player_position(&self) -> Option<IVec2> {
        self.player
            .and_then(|entity| self.world.get::<Position>(entity))
            .map(|position| position.cell)
    }

    pub fn player_facing(&self) -> Option<Direction> {
        self.player
            .and_then(|entity| self.world.get::<Facing>(entity))
            .map(|facing| facing.0)
    }

    pub fn player_lifecycle(&self) -> Option<Lifecycle> {
        self.player.and_then(|entity| self.world.get::<Lifecycle>(entity)).copied()
    }

    /// Every ghost, in spawn order.
    pub fn ghosts(&self) -> Vec<GhostView> {
        self.ghosts
            .iter()
            .filter_map(|&entity| {
                let ghost = self.world.get::<Ghost>(entity)?;
                Some(GhostView {
                    index: ghost.index,
                    cell: self.world.get::<Position>(entity)?.cell,
                    spawn: ghost.spawn,
                    facing: self.world.get::<Facing>(entity)?.0,
                    mode: *self.world.get::<GhostMode>(entity)?,
                    lifecycle: *self.world.get::<Lifecycle>(entity)?,
                })
            })
            .collect()
    }

    /// Events raised by the most recent tick, or by the most recent start or restart.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Takes the events of the most recent tick.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
