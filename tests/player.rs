use bevy_ecs::{entity::Entity, system::RunSystemOnce, world::World};
use glam::IVec2;
use pacman_engine::{
    config::GameplayConfig,
    map::{direction::Direction, tile::TileKind},
    systems::{next_player_move, player_movement_system, BufferedDirection, Facing, Lifecycle, Position},
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

/// An L-shaped corridor: the player starts at the left end, the bend is at (3, 1).
const CORRIDOR: &[&[i32]] = &[
    &[1, 1, 1, 1, 1],
    &[1, 7, 0, 0, 1],
    &[1, 1, 1, 0, 1],
    &[1, 1, 1, 1, 1],
];

fn corridor_world() -> (World, Entity) {
    let mut world = common::create_test_world(common::maze(CORRIDOR), common::fast_gameplay());
    let player = common::spawn_test_player(&mut world, IVec2::new(1, 1));
    (world, player)
}

fn tick(world: &mut World, intent: Option<Direction>) {
    common::set_intent(world, intent);
    world
        .run_system_once(player_movement_system)
        .expect("System should run successfully");
}

fn cell(world: &World, player: Entity) -> IVec2 {
    world.get::<Position>(player).unwrap().cell
}

#[test]
fn test_pending_direction_is_taken_when_legal() {
    let (mut world, player) = corridor_world();

    tick(&mut world, Some(Direction::Right));

    assert_eq!(cell(&world, player), IVec2::new(2, 1));
    assert_eq!(world.get::<Facing>(player).unwrap().0, Direction::Right);
    assert_that(&world.get::<Position>(player).unwrap().moved()).is_true();
}

#[test]
fn test_blocked_pending_direction_keeps_going_straight() {
    let (mut world, player) = corridor_world();

    // Down is a wall at the start, so the player keeps its facing (Right).
    tick(&mut world, Some(Direction::Down));
    assert_eq!(cell(&world, player), IVec2::new(2, 1));
    assert_eq!(world.get::<Facing>(player).unwrap().0, Direction::Right);
    assert_eq!(world.get::<BufferedDirection>(player).unwrap().0, Some(Direction::Down));

    // Still buffered without a new intent.
    tick(&mut world, None);
    assert_eq!(cell(&world, player), IVec2::new(3, 1));

    // The buffered turn is taken at the bend.
    tick(&mut world, None);
    assert_eq!(cell(&world, player), IVec2::new(3, 2));
    assert_eq!(world.get::<Facing>(player).unwrap().0, Direction::Down);
}

#[test]
fn test_new_intent_replaces_pending_direction() {
    let (mut world, player) = corridor_world();

    tick(&mut world, Some(Direction::Down));
    tick(&mut world, Some(Direction::Left));

    assert_eq!(cell(&world, player), IVec2::new(1, 1));
    assert_eq!(world.get::<BufferedDirection>(player).unwrap().0, Some(Direction::Left));
}

#[test]
fn test_player_stays_when_nothing_is_legal() {
    let (mut world, player) = corridor_world();

    tick(&mut world, Some(Direction::Right));
    tick(&mut world, Some(Direction::Right));
    assert_eq!(cell(&world, player), IVec2::new(3, 1));

    // Neither Up nor the facing direction (Right) is open at (3, 1).
    tick(&mut world, Some(Direction::Up));
    assert_eq!(cell(&world, player), IVec2::new(3, 1));
    assert_eq!(world.get::<Facing>(player).unwrap().0, Direction::Right);
    assert_that(&world.get::<Position>(player).unwrap().moved()).is_false();
}

#[test]
fn test_player_never_enters_walls_or_doors() {
    let maze = common::maze(&[
        &[1, 1, 1, 1, 1, 1],
        &[3, 0, 7, 0, 0, 3],
        &[1, 0, 2, 1, 0, 1],
        &[1, 0, 5, 1, 0, 1],
        &[1, 1, 1, 1, 1, 1],
    ]);
    let mut world = common::create_test_world(maze.clone(), common::fast_gameplay());
    let player = common::spawn_test_player(&mut world, maze.player_start());

    let intents = [
        Direction::Down,
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Right,
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Right,
    ];
    for intent in intents.into_iter().cycle().take(60) {
        tick(&mut world, Some(intent));
        let tile = maze.tile(cell(&world, player));
        assert!(
            !matches!(tile, Some(TileKind::Wall) | Some(TileKind::Door) | None),
            "player entered {tile:?} at {}",
            cell(&world, player)
        );
    }
}

#[test]
fn test_player_wraps_through_teleports() {
    let maze = common::maze(&[&[1, 1, 1, 1, 1], &[3, 7, 0, 0, 3], &[1, 1, 1, 1, 1]]);
    let mut world = common::create_test_world(maze, common::fast_gameplay());
    let player = common::spawn_test_player(&mut world, IVec2::new(1, 1));

    tick(&mut world, Some(Direction::Left));
    assert_eq!(cell(&world, player), IVec2::new(0, 1));

    tick(&mut world, None);
    assert_eq!(cell(&world, player), IVec2::new(4, 1));
}

#[test]
fn test_player_moves_on_its_cadence() {
    let gameplay = GameplayConfig {
        player_move_period: 3,
        ..common::fast_gameplay()
    };
    let mut world = common::create_test_world(common::maze(CORRIDOR), gameplay);
    let player = common::spawn_test_player(&mut world, IVec2::new(1, 1));

    tick(&mut world, Some(Direction::Right));
    tick(&mut world, None);
    assert_eq!(cell(&world, player), IVec2::new(1, 1));

    tick(&mut world, None);
    assert_eq!(cell(&world, player), IVec2::new(2, 1));
}

#[test]
fn test_frozen_player_buffers_but_does_not_move() {
    let (mut world, player) = corridor_world();
    world.entity_mut(player).insert(Lifecycle::respawning(5));

    tick(&mut world, Some(Direction::Right));

    assert_eq!(cell(&world, player), IVec2::new(1, 1));
    assert_eq!(world.get::<BufferedDirection>(player).unwrap().0, Some(Direction::Right));
}

#[test]
fn test_next_player_move_prefers_pending() {
    let maze = common::scenario_maze();
    let start = common::SCENARIO_START;

    assert_eq!(
        next_player_move(&maze, start, Some(Direction::Left), Direction::Right),
        Some((Direction::Left, IVec2::new(1, 1)))
    );
    assert_eq!(
        next_player_move(&maze, start, Some(Direction::Up), Direction::Right),
        Some((Direction::Right, IVec2::new(3, 1)))
    );
    assert_eq!(next_player_move(&maze, IVec2::new(1, 2), Some(Direction::Left), Direction::Down), None);
}
