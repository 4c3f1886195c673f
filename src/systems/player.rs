use bevy_ecs::{
    query::With,
    system::{Query, Res},
};
use glam::IVec2;
use tracing::trace;

use crate::{
    config::GameplayConfig,
    map::{direction::Direction, maze::Maze, tile::EntityClass},
    systems::components::{BufferedDirection, Facing, Lifecycle, PlayerControlled, PlayerIntent, Position, Stride},
};

/// Picks the player's next move: the pending direction if legal, else straight on if legal.
///
/// Returns the direction taken and the destination cell.
pub fn next_player_move(maze: &Maze, cell: IVec2, pending: Option<Direction>, facing: Direction) -> Option<(Direction, IVec2)> {
    pending
        .into_iter()
        .chain(std::iter::once(facing))
        .find_map(|dir| maze.step(cell, dir, EntityClass::Player).map(|target| (dir, target)))
}

/// Buffers this tick's intent and moves the player on its cadence.
///
/// A new intent replaces the pending direction; an absent one keeps it. The player
/// never enters a cell its traversal flags forbid.
pub fn player_movement_system(
    maze: Res<Maze>,
    intent: Res<PlayerIntent>,
    gameplay: Res<GameplayConfig>,
    mut players: Query<
        (
            &Lifecycle,
            &mut Position,
            &mut Facing,
            &mut BufferedDirection,
            &mut Stride,
        ),
        With<PlayerControlled>,
    >,
) {
    for (lifecycle, mut position, mut facing, mut buffered, mut stride) in players.iter_mut() {
        position.settle();
        if let Some(direction) = intent.0 {
            buffered.0 = Some(direction);
        }

        if !lifecycle.is_active() || !stride.advance(gameplay.player_move_period) {
            continue;
        }

        if let Some((direction, target)) = next_player_move(&maze, position.cell, buffered.0, facing.0) {
            trace!(from = %position.cell, to = %target, ?direction, "Player moved");
            facing.0 = direction;
            position.move_to(target);
        }
    }
}
