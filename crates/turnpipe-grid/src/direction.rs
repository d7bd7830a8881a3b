//! Cardinal directions, quarter-turn rotations and direction sets.
//!
//! Directions are stored as a 2-bit rotation state in counter-clockwise order
//! (`Up`, `Left`, `Down`, `Right`), so turning left advances the index by one
//! and turning right advances it by three.

use std::fmt;

use bitflags::bitflags;
use glam::IVec2;
use serde::{Deserialize, Serialize};

/// One of the four cardinal directions.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    /// Towards higher rows.
    #[default]
    Up = 0,
    /// Towards lower columns.
    Left = 1,
    /// Towards lower rows.
    Down = 2,
    /// Towards higher columns.
    Right = 3,
}

impl Direction {
    /// Total number of directions.
    pub const COUNT: usize = 4;

    /// Get all directions in rotation-state order.
    #[must_use]
    pub const fn all() -> &'static [Direction] {
        &[
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ]
    }

    /// Get the rotation-state index of this direction.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for a rotation-state index, wrapping modulo four.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index % Self::COUNT {
            0 => Direction::Up,
            1 => Direction::Left,
            2 => Direction::Down,
            _ => Direction::Right,
        }
    }

    /// Unit tile offset of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Down => IVec2::new(0, -1),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// This direction after a quarter turn.
    #[must_use]
    pub const fn rotated(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.steps())
    }

    /// Direction of a unit offset, or `None` for anything that is not a
    /// single cardinal step.
    #[must_use]
    pub fn from_offset(offset: IVec2) -> Option<Self> {
        Self::all().iter().copied().find(|d| d.offset() == offset)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Left => write!(f, "left"),
            Direction::Down => write!(f, "down"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A 90° turn around a pivot.
///
/// `Right` is clockwise on a grid whose rows grow upwards: the offset `(1, 0)`
/// ends at `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Counter-clockwise quarter turn.
    Left,
    /// Clockwise quarter turn.
    Right,
}

impl Rotation {
    /// `-1` for `Left`, `+1` for `Right`.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Rotation::Left => -1,
            Rotation::Right => 1,
        }
    }

    /// Rotation-state steps this turn adds to an orientation.
    #[must_use]
    pub const fn steps(self) -> usize {
        match self {
            Rotation::Left => 1,
            Rotation::Right => 3,
        }
    }

    /// The turn that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Rotation::Left => Rotation::Right,
            Rotation::Right => Rotation::Left,
        }
    }

    /// Exact lattice image of an offset from the pivot after this turn.
    #[must_use]
    pub const fn rotate_offset(self, offset: IVec2) -> IVec2 {
        let s = self.sign();
        IVec2::new(s * offset.y, -s * offset.x)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left => write!(f, "left"),
            Rotation::Right => write!(f, "right"),
        }
    }
}

bitflags! {
    /// A set of cardinal directions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DirectionSet: u8 {
        /// Contains [`Direction::Up`].
        const UP = 1 << 0;
        /// Contains [`Direction::Left`].
        const LEFT = 1 << 1;
        /// Contains [`Direction::Down`].
        const DOWN = 1 << 2;
        /// Contains [`Direction::Right`].
        const RIGHT = 1 << 3;
    }
}

impl DirectionSet {
    /// Check whether a single direction is in the set.
    #[must_use]
    pub fn has(self, direction: Direction) -> bool {
        self.contains(direction.into())
    }

    /// Iterate the contained directions in rotation-state order.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::all()
            .iter()
            .copied()
            .filter(move |d| self.has(*d))
    }
}

impl From<Direction> for DirectionSet {
    fn from(direction: Direction) -> Self {
        Self::from_bits_retain(1 << direction.index())
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, d| set | Self::from(d))
    }
}
