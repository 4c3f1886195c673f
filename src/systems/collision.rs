use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut, Single};
use tracing::{debug, info};

use crate::config::GameplayConfig;
use crate::constants::score;
use crate::events::GameEvent;
use crate::map::maze::Maze;
use crate::systems::components::{
    BufferedDirection, Facing, Ghost, GhostMode, Lifecycle, PlayerControlled, PlayerLives, Position, PowerTimer,
    ScoreResource, Stride,
};

/// Whether the player met a ghost this tick.
///
/// They meet when they share a cell, or when the player stepped into the cell the ghost
/// started the tick on. The second case covers swapping cells and a ghost that moved
/// away from the cell the player just entered.
pub fn entities_met(player: &Position, ghost: &Position) -> bool {
    player.cell == ghost.cell || (player.moved() && player.cell == ghost.previous)
}

/// Resolves player and ghost meetings after every entity has moved.
///
/// A Normal ghost costs a life and sends everyone back to their spawn. A Frightened
/// ghost is eaten for a bonus. Eaten ghosts, and ghosts still waiting out their
/// respawn delay, are harmless.
#[allow(clippy::type_complexity)]
pub fn collision_system(
    maze: Res<Maze>,
    gameplay: Res<GameplayConfig>,
    mut lives: ResMut<PlayerLives>,
    mut score: ResMut<ScoreResource>,
    mut timer: ResMut<PowerTimer>,
    player: Single<
        (
            &mut Position,
            &mut Facing,
            &mut BufferedDirection,
            &mut Stride,
            &mut Lifecycle,
        ),
        With<PlayerControlled>,
    >,
    mut ghosts: Query<
        (
            &Ghost,
            &mut Position,
            &mut Facing,
            &mut Stride,
            &mut GhostMode,
            &mut Lifecycle,
        ),
        Without<PlayerControlled>,
    >,
    mut events: EventWriter<GameEvent>,
) {
    let (mut player_position, mut player_facing, mut buffered, mut player_stride, mut player_lifecycle) = player.into_inner();
    let mut caught = false;

    for (ghost, position, _, _, mut mode, lifecycle) in ghosts.iter_mut() {
        if !lifecycle.is_active() || !entities_met(&player_position, &position) {
            continue;
        }
        match *mode {
            GhostMode::Normal => {
                caught = true;
                break;
            }
            GhostMode::Frightened => {
                *mode = GhostMode::Eaten;
                score.0 += score::GHOST;
                debug!(ghost = ghost.index, cell = %position.cell, score = score.0, "Frightened ghost eaten");
                events.write(GameEvent::GhostEaten { cell: position.cell });
            }
            GhostMode::Eaten => {}
        }
    }

    if !caught {
        return;
    }

    lives.0 = lives.0.saturating_sub(1);
    info!(lives_left = lives.0, cell = %player_position.cell, "Player caught by a ghost");
    events.write(GameEvent::PlayerCaught { lives_left: lives.0 });

    player_position.teleport(maze.player_start());
    *player_facing = Facing::default();
    *buffered = BufferedDirection::default();
    player_stride.reset();
    *player_lifecycle = Lifecycle::respawning(gameplay.player_respawn_ticks);

    for (ghost, mut position, mut facing, mut stride, mut mode, mut lifecycle) in ghosts.iter_mut() {
        position.teleport(ghost.spawn);
        *facing = Facing::default();
        stride.reset();
        *mode = GhostMode::Normal;
        *lifecycle = Lifecycle::Active;
    }
    timer.remaining_ticks = 0;
}
