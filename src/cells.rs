use smallvec::SmallVec;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex};

/// Position of a cell on the grid. Row 0 is the northern boundary, column 0 the western one.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    pub row: u32,
    pub col: u32,
}

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;
pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

impl Coordinate {
    pub fn new(row: u32, col: u32) -> Coordinate {
        Coordinate { row, col }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> Coordinate {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        Coordinate::new(row as u32, col as u32)
    }

    #[inline]
    pub fn from_row_major_index(index: usize, dimension: usize) -> Coordinate {
        let row = index / dimension;
        let col = index % dimension;
        Coordinate::new(row as u32, col as u32)
    }

    /// Creates a new `Coordinate` offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable, it may still be off the grid otherwise.
    pub fn offset(self, dir: CompassPrimary) -> Option<Coordinate> {
        let (row, col) = (self.row, self.col);
        match dir {
            CompassPrimary::North => row.checked_sub(1).map(|r| Coordinate::new(r, col)),
            CompassPrimary::South => row.checked_add(1).map(|r| Coordinate::new(r, col)),
            CompassPrimary::East => col.checked_add(1).map(|c| Coordinate::new(row, c)),
            CompassPrimary::West => col.checked_sub(1).map(|c| Coordinate::new(row, c)),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// The fixed order in which every generator and solver considers the neighbours of a cell.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }
}

/// A single room of the maze.
///
/// Wall flags can only be removed through `Grid::link`, which always removes the facing wall of the
/// neighbouring cell in the same operation.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Cell {
    coordinate: Coordinate,
    north: bool,
    south: bool,
    east: bool,
    west: bool,
    visited: bool,
    on_path: bool,
}

impl Cell {
    pub fn new(coordinate: Coordinate) -> Cell {
        Cell {
            coordinate,
            north: true,
            south: true,
            east: true,
            west: true,
            visited: false,
            on_path: false,
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[inline]
    pub fn has_wall(&self, dir: CompassPrimary) -> bool {
        match dir {
            CompassPrimary::North => self.north,
            CompassPrimary::South => self.south,
            CompassPrimary::East => self.east,
            CompassPrimary::West => self.west,
        }
    }

    /// Directions in which this cell has no wall.
    pub fn open_directions(&self) -> DirectionSmallVec {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .filter(|dir| !self.has_wall(*dir))
            .collect()
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    #[inline]
    pub fn is_on_path(&self) -> bool {
        self.on_path
    }

    #[inline]
    pub(crate) fn remove_wall(&mut self, dir: CompassPrimary) {
        match dir {
            CompassPrimary::North => self.north = false,
            CompassPrimary::South => self.south = false,
            CompassPrimary::East => self.east = false,
            CompassPrimary::West => self.west = false,
        }
    }

    #[inline]
    pub(crate) fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    #[inline]
    pub(crate) fn set_on_path(&mut self, on_path: bool) {
        self.on_path = on_path;
    }
}
