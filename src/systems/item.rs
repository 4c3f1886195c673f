use bevy_ecs::{
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut, Single},
};
use rand::{seq::IndexedRandom, Rng};
use tracing::{debug, trace};

use crate::{
    config::GameplayConfig,
    events::GameEvent,
    map::{maze::Maze, tile::Collectible},
    systems::components::{BonusFruit, GhostMode, PlayerControlled, Position, PowerTimer, ScoreResource},
};

/// Consumes the collectible under the player, if any.
///
/// A power pellet turns every Normal ghost Frightened in the same tick and restarts the
/// frightened countdown. Eaten ghosts are unaffected.
pub fn item_system(
    mut maze: ResMut<Maze>,
    mut score: ResMut<ScoreResource>,
    mut timer: ResMut<PowerTimer>,
    gameplay: Res<GameplayConfig>,
    player: Single<&Position, With<PlayerControlled>>,
    mut ghosts: Query<&mut GhostMode, Without<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    let cell = player.cell;
    let Some(kind) = maze.consume(cell) else {
        return;
    };

    score.0 += kind.score_value();
    trace!(%cell, ?kind, score = score.0, "Collectible consumed");
    events.write(GameEvent::CollectibleConsumed { cell, kind });

    if kind == Collectible::PowerPellet {
        let mut frightened = 0;
        for mut mode in ghosts.iter_mut() {
            if *mode == GhostMode::Normal {
                *mode = GhostMode::Frightened;
                frightened += 1;
            }
        }
        timer.remaining_ticks = gameplay.frightened_ticks;
        debug!(frightened, duration_ticks = timer.remaining_ticks, "Power pellet consumed, frightening ghosts");
        events.write(GameEvent::GhostsFrightened);
    }
}

/// Occasionally places a bonus fruit on a free floor cell, up to a per-game limit.
pub fn bonus_fruit_system(
    mut maze: ResMut<Maze>,
    mut bonus: ResMut<BonusFruit>,
    gameplay: Res<GameplayConfig>,
    player: Single<&Position, With<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    if gameplay.bonus_fruit_chance == 0 || bonus.placed >= gameplay.bonus_fruit_limit {
        return;
    }
    if !bonus.rng.random_ratio(1, gameplay.bonus_fruit_chance) {
        return;
    }

    let candidates: Vec<_> = maze
        .bonus_fruit_cells()
        .into_iter()
        .filter(|&cell| cell != player.cell)
        .collect();
    let Some(&cell) = candidates.choose(&mut bonus.rng) else {
        trace!("No free cell for a bonus fruit");
        return;
    };

    if maze.place_collectible(cell, Collectible::Fruit) {
        bonus.placed += 1;
        debug!(%cell, placed = bonus.placed, "Bonus fruit placed");
        events.write(GameEvent::BonusFruitPlaced { cell });
    }
}
