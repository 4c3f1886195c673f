use glam::IVec2;
use pacman_engine::{
    autopilot::{path_to_nearest_collectible, steer},
    map::direction::Direction,
};
use pretty_assertions::assert_eq;

mod common;

#[test]
fn test_path_to_nearest_collectible() {
    let maze = common::scenario_maze();

    let path = path_to_nearest_collectible(&maze, common::SCENARIO_START).unwrap();

    assert_eq!(path.len(), 2);
    assert_eq!(path[0], common::SCENARIO_START);
    assert!(maze.collectible_at(path[1]).is_some());
}

#[test]
fn test_steer_walks_around_walls() {
    let maze = common::maze(&[
        &[1, 1, 1, 1, 1],
        &[1, 7, 1, 0, 1],
        &[1, -1, -1, -1, 1],
        &[1, 1, 1, 1, 1],
    ]);

    assert_eq!(steer(&maze, IVec2::new(1, 1)), Some(Direction::Down));
    assert_eq!(steer(&maze, IVec2::new(1, 2)), Some(Direction::Right));
    assert_eq!(steer(&maze, IVec2::new(3, 2)), Some(Direction::Up));
}

#[test]
fn test_steer_uses_teleports() {
    let maze = common::maze(&[
        &[1, 1, 1, 1, 1, 1, 1],
        &[3, 7, -1, -1, -1, 0, 3],
        &[1, 1, 1, 1, 1, 1, 1],
    ]);

    let path = path_to_nearest_collectible(&maze, IVec2::new(1, 1)).unwrap();

    assert_eq!(path, vec![IVec2::new(1, 1), IVec2::new(0, 1), IVec2::new(6, 1), IVec2::new(5, 1)]);
    assert_eq!(steer(&maze, IVec2::new(1, 1)), Some(Direction::Left));
}

#[test]
fn test_steer_without_collectibles() {
    let maze = common::maze(&[&[1, 1, 1], &[1, 7, 1], &[1, 1, 1]]);

    assert_eq!(steer(&maze, IVec2::new(1, 1)), None);
}
