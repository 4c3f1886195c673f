use bevy_ecs::{
    event::EventWriter,
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::{
    events::GameEvent,
    map::maze::Maze,
    systems::components::{CurrentLevel, HighscoreTarget, Lifecycle, PlayerControlled, PlayerLives, ScoreResource},
};

/// A resource to track the overall stage of the game from a high-level perspective.
#[derive(Resource, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum GameStage {
    /// A level is being read and built.
    #[default]
    Loading,
    /// The main gameplay loop is active.
    Playing,
    /// Every collectible of the current level is gone; the next level loads on the next tick.
    LevelComplete,
    /// The player ran out of lives.
    GameOver,
    /// The last configured level was cleared.
    GameComplete,
    /// The next level could not be loaded.
    Halted,
}

impl GameStage {
    /// Whether no further tick can change the game without a restart.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStage::GameOver | GameStage::GameComplete | GameStage::Halted)
    }
}

/// Run condition: the stage is [`GameStage::Playing`].
pub fn is_playing(stage: Res<GameStage>) -> bool {
    *stage == GameStage::Playing
}

/// Run condition: the player is not frozen.
pub fn player_is_active(players: Query<&Lifecycle, With<PlayerControlled>>) -> bool {
    players.single().is_ok_and(|lifecycle| lifecycle.is_active())
}

/// Counts down respawn freezes for the player and ghosts.
pub fn respawn_system(mut entities: Query<&mut Lifecycle>) {
    for mut lifecycle in entities.iter_mut() {
        if lifecycle.tick() {
            debug!("Respawn freeze ended");
        }
    }
}

/// Fires [`GameEvent::HighscoreBeaten`] the first time the score passes the target.
pub fn highscore_watch_system(
    score: Res<ScoreResource>,
    mut target: ResMut<HighscoreTarget>,
    mut events: EventWriter<GameEvent>,
) {
    let Some(best) = target.score else {
        return;
    };
    if !target.beaten && score.0 > best {
        target.beaten = true;
        info!(score = score.0, previous = best, "Highscore beaten");
        events.write(GameEvent::HighscoreBeaten { score: score.0 });
    }
}

/// Ends the game when lives run out, or the level when no collectibles remain.
pub fn progress_system(
    maze: Res<Maze>,
    lives: Res<PlayerLives>,
    level: Res<CurrentLevel>,
    mut stage: ResMut<GameStage>,
    mut events: EventWriter<GameEvent>,
) {
    if lives.0 == 0 {
        info!(level = level.0, "Game over");
        *stage = GameStage::GameOver;
        events.write(GameEvent::GameOver);
    } else if maze.remaining() == 0 {
        info!(level = level.0, "Level cleared");
        *stage = GameStage::LevelComplete;
        events.write(GameEvent::LevelCleared { level: level.0 });
    }
}
