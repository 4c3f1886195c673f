use glam::IVec2;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};

/// The four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter, Serialize, Deserialize)]
#[repr(usize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// The four cardinal directions, in the fixed order used to break ties.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the direction as a unit grid offset (x = column, y = row).
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    /// Whether the direction moves along the horizontal axis.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Returns the direction as a usize (0-3). Constant time.
    pub const fn as_usize(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_direction_opposite() {
        for dir in Direction::iter() {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.as_ivec2() + dir.opposite().as_ivec2(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_direction_as_ivec2() {
        assert_eq!(Direction::Up.as_ivec2(), IVec2::new(0, -1));
        assert_eq!(Direction::Down.as_ivec2(), IVec2::new(0, 1));
        assert_eq!(Direction::Left.as_ivec2(), IVec2::new(-1, 0));
        assert_eq!(Direction::Right.as_ivec2(), IVec2::new(1, 0));
    }

    #[test]
    fn test_direction_indices_match_order() {
        for (i, dir) in Direction::DIRECTIONS.iter().enumerate() {
            assert_eq!(dir.as_usize(), i);
        }
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(Direction::Left.as_ref(), "left");
        assert!(!Direction::Up.is_horizontal());
        assert!(Direction::Right.is_horizontal());
    }
}
