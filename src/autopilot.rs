//! A simple driver for headless runs: walks to the nearest remaining collectible.

use glam::IVec2;
use pathfinding::prelude::bfs;

use crate::map::direction::Direction;
use crate::map::maze::Maze;
use crate::map::tile::EntityClass;

/// The shortest player path from `from` to the closest collectible, including both ends.
pub fn path_to_nearest_collectible(maze: &Maze, from: IVec2) -> Option<Vec<IVec2>> {
    bfs(
        &from,
        |&cell| maze.neighbours(cell, EntityClass::Player),
        |&cell| cell != from && maze.collectible_at(cell).is_some(),
    )
}

/// The direction of the first step towards the nearest collectible.
pub fn steer(maze: &Maze, from: IVec2) -> Option<Direction> {
    let path = path_to_nearest_collectible(maze, from)?;
    let next = *path.get(1)?;
    maze.direction_between(from, next, EntityClass::Player)
}
