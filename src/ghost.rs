//! Ghost steering: pluggable strategies that pick the next direction of a ghost.
//!
//! Every strategy only ever returns a legal ghost move, and never reverses the ghost's
//! facing unless reversing is the only legal move.

use std::collections::HashMap;

use glam::IVec2;
use pathfinding::prelude::dijkstra_all;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::{AsRefStr, EnumIter};
use tracing::trace;

use crate::map::direction::Direction;
use crate::map::maze::Maze;
use crate::map::tile::EntityClass;

/// Everything a strategy may look at when steering one ghost.
#[derive(Debug, Clone, Copy)]
pub struct SteeringContext<'a> {
    pub maze: &'a Maze,
    /// The ghost's position in spawn order.
    pub index: usize,
    pub cell: IVec2,
    pub facing: Direction,
    pub player: IVec2,
    /// The ghost's spawn cell.
    pub home: IVec2,
}

impl SteeringContext<'_> {
    /// Legal ghost moves that do not reverse, or the reversal if nothing else is legal.
    pub fn candidates(&self) -> SmallVec<[Direction; 4]> {
        let legal = self.maze.legal_directions(self.cell, EntityClass::Ghost);
        let forward: SmallVec<[Direction; 4]> = legal
            .iter()
            .copied()
            .filter(|&dir| dir != self.facing.opposite())
            .collect();
        if forward.is_empty() {
            legal
        } else {
            forward
        }
    }

    /// The cell a candidate direction leads to.
    fn target_of(&self, direction: Direction) -> Option<IVec2> {
        self.maze.step(self.cell, direction, EntityClass::Ghost)
    }
}

/// Chooses the next direction for a ghost. `None` means the ghost stays put.
pub trait GhostStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn choose(&mut self, ctx: &SteeringContext<'_>) -> Option<Direction>;
}

/// Shortest-path distances, in moves, from every reachable cell to `target`.
fn distance_field(maze: &Maze, target: IVec2) -> HashMap<IVec2, usize> {
    let mut field: HashMap<IVec2, usize> = dijkstra_all(&target, |&cell| {
        maze.neighbours(cell, EntityClass::Ghost)
            .into_iter()
            .map(|next| (next, 1usize))
    })
    .into_iter()
    .map(|(cell, (_, cost))| (cell, cost))
    .collect();
    field.insert(target, 0);
    field
}

/// Picks the candidate whose destination is closest to `target`. Ties go to the
/// earliest candidate, and unreachable destinations rank last.
fn steer_towards(ctx: &SteeringContext<'_>, target: IVec2) -> Option<Direction> {
    let field = distance_field(ctx.maze, target);
    ctx.candidates().into_iter().min_by_key(|&dir| {
        ctx.target_of(dir)
            .and_then(|cell| field.get(&cell).copied())
            .unwrap_or(usize::MAX)
    })
}

/// Chases the player along the shortest ghost path.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pursuit;

impl GhostStrategy for Pursuit {
    fn name(&self) -> &'static str {
        "pursuit"
    }

    fn choose(&mut self, ctx: &SteeringContext<'_>) -> Option<Direction> {
        steer_towards(ctx, ctx.player)
    }
}

/// Keeps going straight; at a wall, turns by a preference order rotated per ghost.
#[derive(Debug, Default, Clone, Copy)]
pub struct Patrol;

impl Patrol {
    /// The turn order for the ghost at `index`.
    pub fn preference(index: usize) -> [Direction; 4] {
        let mut order = Direction::DIRECTIONS;
        let len = order.len();
        order.rotate_left(index % len);
        order
    }
}

impl GhostStrategy for Patrol {
    fn name(&self) -> &'static str {
        "patrol"
    }

    fn choose(&mut self, ctx: &SteeringContext<'_>) -> Option<Direction> {
        let candidates = ctx.candidates();
        if candidates.contains(&ctx.facing) {
            return Some(ctx.facing);
        }
        Self::preference(ctx.index)
            .into_iter()
            .find(|dir| candidates.contains(dir))
    }
}

/// Picks uniformly among the non-reversing moves at every step, from a seeded generator.
#[derive(Debug, Clone)]
pub struct Wander {
    rng: SmallRng,
}

impl Wander {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl GhostStrategy for Wander {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn choose(&mut self, ctx: &SteeringContext<'_>) -> Option<Direction> {
        let candidates = ctx.candidates();
        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            many => {
                let choice = many.choose(&mut self.rng).copied();
                trace!(ghost = ctx.index, options = many.len(), ?choice, "Ghost chose at intersection");
                choice
            }
        }
    }
}

/// Frightened steering: moves to the candidate farthest from the player.
#[derive(Debug, Default, Clone, Copy)]
pub struct Retreat;

impl GhostStrategy for Retreat {
    fn name(&self) -> &'static str {
        "retreat"
    }

    fn choose(&mut self, ctx: &SteeringContext<'_>) -> Option<Direction> {
        let field = distance_field(ctx.maze, ctx.player);
        let candidates = ctx.candidates();
        let mut best: Option<(Direction, usize)> = None;
        for dir in candidates {
            let distance = ctx
                .target_of(dir)
                .and_then(|cell| field.get(&cell).copied())
                .unwrap_or(usize::MAX);
            // Strictly greater keeps the earliest direction on ties.
            if best.is_none_or(|(_, farthest)| distance > farthest) {
                best = Some((dir, distance));
            }
        }
        best.map(|(dir, _)| dir)
    }
}

/// Eaten steering: takes the shortest path back to the ghost's spawn.
#[derive(Debug, Default, Clone, Copy)]
pub struct Homing;

impl GhostStrategy for Homing {
    fn name(&self) -> &'static str {
        "homing"
    }

    fn choose(&mut self, ctx: &SteeringContext<'_>) -> Option<Direction> {
        if ctx.cell == ctx.home {
            return None;
        }
        steer_towards(ctx, ctx.home)
    }
}

/// The configurable Normal-mode strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, AsRefStr, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StrategyKind {
    Pursuit,
    Patrol,
    #[default]
    Wander,
}

impl StrategyKind {
    /// Builds the strategy. `seed` only matters for [`StrategyKind::Wander`].
    pub fn build(self, seed: u64) -> Box<dyn GhostStrategy> {
        match self {
            StrategyKind::Pursuit => Box::new(Pursuit),
            StrategyKind::Patrol => Box::new(Patrol),
            StrategyKind::Wander => Box::new(Wander::new(seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_preference_rotates_per_ghost() {
        assert_eq!(Patrol::preference(0), Direction::DIRECTIONS);
        assert_eq!(
            Patrol::preference(1),
            [Direction::Down, Direction::Left, Direction::Right, Direction::Up]
        );
        assert_eq!(Patrol::preference(4), Direction::DIRECTIONS);
    }

    #[test]
    fn test_strategy_kind_names() {
        assert_eq!(StrategyKind::Pursuit.build(0).name(), "pursuit");
        assert_eq!(StrategyKind::Wander.build(7).name(), "wander");
        assert_eq!(StrategyKind::Patrol.as_ref(), "patrol");
    }
}
