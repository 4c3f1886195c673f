use bevy_ecs::{
    query::{With, Without},
    system::{Query, Res, ResMut, Single},
};
use tracing::{debug, trace, warn};

use crate::{
    config::GameplayConfig,
    ghost::SteeringContext,
    map::{maze::Maze, tile::EntityClass},
    systems::components::{Facing, Ghost, GhostBrain, GhostMode, Lifecycle, PlayerControlled, Position, Stride},
};

/// Ticks per move for a ghost in the given mode.
pub fn ghost_move_period(gameplay: &GameplayConfig, mode: GhostMode) -> u32 {
    match mode {
        GhostMode::Normal => gameplay.ghost_move_period,
        GhostMode::Frightened => gameplay.frightened_move_period,
        GhostMode::Eaten => gameplay.eaten_move_period,
    }
}

/// Steers and moves every ghost on its mode's cadence.
///
/// An eaten ghost standing on its spawn turns Normal again and waits out its respawn
/// delay before it moves. Movement always uses ghost traversal rules, so doors are passable.
pub fn ghost_movement_system(
    maze: Res<Maze>,
    gameplay: Res<GameplayConfig>,
    mut brain: ResMut<GhostBrain>,
    player: Single<&Position, With<PlayerControlled>>,
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
) {
    let player_cell = player.cell;

    for (ghost, mut position, mut facing, mut stride, mut mode, mut lifecycle) in ghosts.iter_mut() {
        position.settle();

        if *mode == GhostMode::Eaten && position.cell == ghost.spawn {
            debug!(ghost = ghost.index, spawn = %ghost.spawn, "Eaten ghost returned to spawn");
            *mode = GhostMode::Normal;
            *lifecycle = Lifecycle::respawning(gameplay.ghost_respawn_ticks);
            stride.reset();
            continue;
        }

        if !lifecycle.is_active() || !stride.advance(ghost_move_period(&gameplay, *mode)) {
            continue;
        }

        let ctx = SteeringContext {
            maze: &maze,
            index: ghost.index,
            cell: position.cell,
            facing: facing.0,
            player: player_cell,
            home: ghost.spawn,
        };
        let strategy = brain.for_mode(*mode);
        let Some(direction) = strategy.choose(&ctx) else {
            continue;
        };

        match maze.step(position.cell, direction, EntityClass::Ghost) {
            Some(target) => {
                trace!(ghost = ghost.index, from = %position.cell, to = %target, ?direction, strategy = strategy.name(), "Ghost moved");
                facing.0 = direction;
                position.move_to(target);
            }
            None => {
                warn!(ghost = ghost.index, cell = %position.cell, ?direction, strategy = strategy.name(), "Strategy chose an illegal move");
            }
        }
    }
}
