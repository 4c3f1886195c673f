//! Maze construction: derives the rule tables every tick consults from a [`TileGrid`].

use std::collections::HashMap;

use bevy_ecs::resource::Resource;
use glam::IVec2;
use smallvec::SmallVec;
use strum_macros::Display;
use tracing::{debug, trace};

use crate::error::InvalidTeleportConfigurationError;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::map::tile::{Collectible, EntityClass, TileKind};

/// A boundary edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// The direction that walks off the grid across this edge.
    pub fn outward(self) -> Direction {
        match self {
            Edge::Left => Direction::Left,
            Edge::Right => Direction::Right,
            Edge::Top => Direction::Up,
            Edge::Bottom => Direction::Down,
        }
    }
}

/// The main maze structure: the static grid plus everything derived from it.
///
/// Walls and doors come from the grid. Collectibles are the only part that
/// changes during play.
#[derive(Resource, Debug, Clone)]
pub struct Maze {
    grid: TileGrid,
    /// Remaining collectibles, keyed by cell.
    collectibles: HashMap<IVec2, Collectible>,
    /// Where stepping off a teleport cell in a given direction lands.
    warps: HashMap<(IVec2, Direction), IVec2>,
    ghost_spawns: Vec<IVec2>,
    player_start: IVec2,
}

impl Maze {
    /// Builds the maze rule tables from a parsed grid.
    ///
    /// # Errors
    ///
    /// Returns an error if any teleport cell lacks a partner on the opposite edge,
    /// or sits away from the boundary.
    pub fn new(grid: TileGrid) -> Result<Maze, InvalidTeleportConfigurationError> {
        let player_start = grid.player_start();
        let extra_starts = grid.find(TileKind::PlayerStart).count() - 1;
        if extra_starts > 0 {
            debug!(extra_starts, start = %player_start, "Multiple player starts, using the first");
        }

        let collectibles: HashMap<IVec2, Collectible> = grid
            .cells()
            .filter_map(|(cell, tile)| tile.collectible().map(|item| (cell, item)))
            .collect();
        let ghost_spawns: Vec<IVec2> = grid.find(TileKind::GhostSpawn).collect();
        let warps = Self::build_warps(&grid)?;

        debug!(
            collectibles = collectibles.len(),
            ghost_spawns = ghost_spawns.len(),
            warps = warps.len(),
            "Maze built"
        );

        Ok(Maze {
            grid,
            collectibles,
            warps,
            ghost_spawns,
            player_start,
        })
    }

    /// Pairs teleport cells across opposite edges by matching row or column.
    fn build_warps(grid: &TileGrid) -> Result<HashMap<(IVec2, Direction), IVec2>, InvalidTeleportConfigurationError> {
        let (last_column, last_row) = (grid.columns() - 1, grid.rows() - 1);
        let mut warps = HashMap::new();

        for cell in grid.find(TileKind::Teleport) {
            let edges: SmallVec<[Edge; 2]> = [
                (cell.x == 0).then_some(Edge::Left),
                (cell.x == last_column).then_some(Edge::Right),
                (cell.y == 0).then_some(Edge::Top),
                (cell.y == last_row).then_some(Edge::Bottom),
            ]
            .into_iter()
            .flatten()
            .collect();

            if edges.is_empty() {
                return Err(InvalidTeleportConfigurationError::Interior { cell });
            }

            for edge in edges {
                let partner = match edge {
                    Edge::Left => IVec2::new(last_column, cell.y),
                    Edge::Right => IVec2::new(0, cell.y),
                    Edge::Top => IVec2::new(cell.x, last_row),
                    Edge::Bottom => IVec2::new(cell.x, 0),
                };
                if grid.get(partner) != Some(TileKind::Teleport) {
                    return Err(InvalidTeleportConfigurationError::Unpaired {
                        cell,
                        edge,
                        expected: partner,
                    });
                }
                trace!(from = %cell, to = %partner, %edge, "Teleport paired");
                warps.insert((cell, edge.outward()), partner);
            }
        }

        Ok(warps)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn player_start(&self) -> IVec2 {
        self.player_start
    }

    /// Ghost spawn cells in row-major order.
    pub fn ghost_spawns(&self) -> &[IVec2] {
        &self.ghost_spawns
    }

    pub fn tile(&self, cell: IVec2) -> Option<TileKind> {
        self.grid.get(cell)
    }

    /// Whether an entity of `class` may stand on `cell`. Out-of-bounds cells are never walkable.
    pub fn is_walkable(&self, cell: IVec2, class: EntityClass) -> bool {
        self.grid
            .get(cell)
            .is_some_and(|tile| tile.traversal_flags().contains(class.traversal_flags()))
    }

    pub fn is_door(&self, cell: IVec2) -> bool {
        self.grid.get(cell) == Some(TileKind::Door)
    }

    /// Where stepping off `cell` in `direction` wraps to, if `cell` is a paired teleport.
    pub fn warp_target(&self, cell: IVec2, direction: Direction) -> Option<IVec2> {
        self.warps.get(&(cell, direction)).copied()
    }

    /// Iterates every wrap as `(from, direction, to)`.
    pub fn warps(&self) -> impl Iterator<Item = (IVec2, Direction, IVec2)> + '_ {
        self.warps.iter().map(|(&(from, dir), &to)| (from, dir, to))
    }

    /// The movement legality rule.
    ///
    /// A move from `from` in `direction` targets the adjacent cell. In bounds, it is legal
    /// when that cell admits `class`. Out of bounds, it is legal only when `from` is a
    /// teleport paired along that axis, and the move lands on the partner instead.
    ///
    /// Returns the destination cell of a legal move.
    pub fn step(&self, from: IVec2, direction: Direction, class: EntityClass) -> Option<IVec2> {
        let next = from + direction.as_ivec2();
        let target = if self.grid.contains(next) {
            next
        } else {
            self.warp_target(from, direction)?
        };
        self.is_walkable(target, class).then_some(target)
    }

    /// Every direction with a legal move from `from`, in [`Direction::DIRECTIONS`] order.
    pub fn legal_directions(&self, from: IVec2, class: EntityClass) -> SmallVec<[Direction; 4]> {
        Direction::DIRECTIONS
            .into_iter()
            .filter(|&dir| self.step(from, dir, class).is_some())
            .collect()
    }

    /// Every cell reachable in one legal move from `from`.
    pub fn neighbours(&self, from: IVec2, class: EntityClass) -> SmallVec<[IVec2; 4]> {
        Direction::DIRECTIONS
            .into_iter()
            .filter_map(|dir| self.step(from, dir, class))
            .collect()
    }

    /// The direction of a legal single move from `from` to `to`, if one exists.
    pub fn direction_between(&self, from: IVec2, to: IVec2, class: EntityClass) -> Option<Direction> {
        Direction::DIRECTIONS
            .into_iter()
            .find(|&dir| self.step(from, dir, class) == Some(to))
    }

    pub fn collectible_at(&self, cell: IVec2) -> Option<Collectible> {
        self.collectibles.get(&cell).copied()
    }

    /// Removes and returns the collectible at `cell`.
    pub fn consume(&mut self, cell: IVec2) -> Option<Collectible> {
        let item = self.collectibles.remove(&cell);
        if let Some(item) = item {
            trace!(cell = %cell, ?item, remaining = self.collectibles.len(), "Collectible consumed");
        }
        item
    }

    /// Places a collectible on an empty, player-walkable cell. Returns whether it was placed.
    pub fn place_collectible(&mut self, cell: IVec2, item: Collectible) -> bool {
        if self.collectibles.contains_key(&cell) || !self.is_walkable(cell, EntityClass::Player) {
            return false;
        }
        self.collectibles.insert(cell, item);
        true
    }

    /// Number of collectibles still in the maze.
    pub fn remaining(&self) -> usize {
        self.collectibles.len()
    }

    /// Number of remaining collectibles of one kind.
    pub fn remaining_of(&self, item: Collectible) -> usize {
        self.collectibles.values().filter(|&&c| c == item).count()
    }

    pub fn collectibles(&self) -> impl Iterator<Item = (IVec2, Collectible)> + '_ {
        self.collectibles.iter().map(|(&cell, &item)| (cell, item))
    }

    /// Cells where a bonus fruit may appear: plain floor, currently empty.
    ///
    /// Returned in row-major order so seeded picks are reproducible.
    pub fn bonus_fruit_cells(&self) -> Vec<IVec2> {
        self.grid
            .cells()
            .filter(|(cell, tile)| {
                matches!(tile, TileKind::Empty | TileKind::Pellet | TileKind::PowerPellet | TileKind::Fruit)
                    && !self.collectibles.contains_key(cell)
            })
            .map(|(cell, _)| cell)
            .collect()
    }
}
