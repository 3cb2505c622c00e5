//! Cells, orientations and the arithmetic between them.
//!
//! Screen coordinates: the origin is the top-left corner, `x` grows to the
//! right and `y` grows downward, so moving North decrements `y`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(
    Default, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one unit ahead when facing `dir`.
    pub fn step(self, dir: Orientation) -> Self {
        match dir {
            Orientation::North => Self::new(self.x, self.y - 1),
            Orientation::East => Self::new(self.x + 1, self.y),
            Orientation::South => Self::new(self.x, self.y + 1),
            Orientation::West => Self::new(self.x - 1, self.y),
        }
    }

    /// Orthogonal neighbours in the fixed order N, E, S, W.
    ///
    /// No bound is applied here; the edge of the world is only learned
    /// through bumps and is tracked by the knowledge base.
    pub fn neighbors(self) -> [Cell; 4] {
        Orientation::ALL.map(|dir| self.step(dir))
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Free-function form of [`Cell::neighbors`].
pub fn neighbors(cell: Cell) -> [Cell; 4] {
    cell.neighbors()
}

/// Free-function form of [`Cell::step`].
pub fn step(cell: Cell, dir: Orientation) -> Cell {
    cell.step(dir)
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [Self::North, Self::East, Self::South, Self::West];

    fn index(self) -> u8 {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }

    fn from_index(i: u8) -> Self {
        Self::ALL[(i % 4) as usize]
    }

    /// Orientation after a 90° counter-clockwise turn.
    pub fn left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Orientation after a 90° clockwise turn.
    pub fn right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Direction of `to` seen from `from`, when the two cells are adjacent.
    pub fn towards(from: Cell, to: Cell) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| from.step(*dir) == to)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}

/// Number of 90° rotations needed to go from `from` to `to`: 0, 1 or 2.
pub fn turn_cost(from: Orientation, to: Orientation) -> u8 {
    let diff = (to.index() + 4 - from.index()) % 4;
    match diff {
        0 => 0,
        2 => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_uses_screen_coordinates() {
        let c = Cell::new(2, 2);
        assert_eq!(c.step(Orientation::North), Cell::new(2, 1));
        assert_eq!(c.step(Orientation::South), Cell::new(2, 3));
        assert_eq!(c.step(Orientation::East), Cell::new(3, 2));
        assert_eq!(c.step(Orientation::West), Cell::new(1, 2));
    }

    #[test]
    fn neighbors_are_unclipped_and_ordered() {
        let n = neighbors(Cell::new(0, 0));
        assert_eq!(
            n,
            [
                Cell::new(0, -1),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(-1, 0)
            ]
        );
    }

    #[test]
    fn turn_costs() {
        use Orientation::*;
        assert_eq!(turn_cost(East, East), 0);
        assert_eq!(turn_cost(East, South), 1);
        assert_eq!(turn_cost(East, North), 1);
        assert_eq!(turn_cost(East, West), 2);
        assert_eq!(turn_cost(North, South), 2);
        for a in Orientation::ALL {
            for b in Orientation::ALL {
                assert_eq!(turn_cost(a, b), turn_cost(b, a));
            }
        }
    }

    #[test]
    fn rotations_cycle() {
        for dir in Orientation::ALL {
            assert_eq!(dir.left().right(), dir);
            assert_eq!(dir.right().right(), dir.opposite());
            assert_eq!(dir.left().left().left().left(), dir);
        }
        assert_eq!(Orientation::East.right(), Orientation::South);
        assert_eq!(Orientation::East.left(), Orientation::North);
    }

    #[test]
    fn towards_adjacent_only() {
        let a = Cell::new(1, 1);
        assert_eq!(
            Orientation::towards(a, Cell::new(1, 0)),
            Some(Orientation::North)
        );
        assert_eq!(Orientation::towards(a, Cell::new(3, 1)), None);
        assert_eq!(Orientation::towards(a, a), None);
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Cell::new(0, 0).manhattan(Cell::new(3, -2)), 5);
    }
}
