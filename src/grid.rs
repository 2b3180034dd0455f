use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use std::error::Error;
use std::fmt;

use crate::cells::{Cell, CompassPrimary, Coordinate, CoordinateSmallVec};
use crate::errors::MazeError;
use crate::units::{ColumnIndex, EdgesCount, NodesCount, RowIndex};

/// A square grid of cells. Removing the wall between two cells links them with a passage.
#[derive(Clone)]
pub struct Grid {
    dimension: usize,
    cells: Vec<Cell>,
    route: Vec<Coordinate>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    NotAdjacent,
}

impl fmt::Display for CellLinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CellLinkError::InvalidGridCoordinate => write!(f, "coordinate is outside of the grid"),
            CellLinkError::NotAdjacent => write!(f, "only adjacent cells can be linked"),
        }
    }
}

impl Error for CellLinkError {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: dimension: {:?}, passages: {:?}, route length: {:?}",
               self.dimension,
               self.links_count(),
               self.route.len())
    }
}

impl Grid {
    /// Create a `dimension` * `dimension` grid with every wall in place.
    ///
    /// Fails without panicking if the dimension is zero, the cells could not be addressed or their
    /// storage cannot be allocated.
    pub fn new(dimension: usize) -> Result<Grid, MazeError> {
        let fits_coordinates = dimension <= u32::MAX as usize;
        let cells_count = dimension.checked_mul(dimension);
        let cells_count = match cells_count {
            Some(count) if dimension > 0 && fits_coordinates => count,
            _ => return Err(MazeError::InvalidDimension(dimension)),
        };

        let mut cells: Vec<Cell> = Vec::new();
        if cells.try_reserve_exact(cells_count).is_err() {
            return Err(MazeError::InvalidDimension(dimension));
        }
        cells.extend((0..cells_count)
            .map(|index| Cell::new(Coordinate::from_row_major_index(index, dimension))));

        Ok(Grid {
            dimension,
            cells,
            route: Vec::new(),
        })
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// The top left cell, where every solver starts.
    #[inline]
    pub fn start(&self) -> Coordinate {
        Coordinate::new(0, 0)
    }

    /// The bottom right cell, where every solver is heading.
    #[inline]
    pub fn goal(&self) -> Coordinate {
        let last = (self.dimension - 1) as u32;
        Coordinate::new(last, last)
    }

    /// Node and edge counts of the passage graph of a perfect maze on this grid.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        (NodesCount(cells_count), EdgesCount(cells_count.saturating_sub(1)))
    }

    #[inline]
    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    fn cell_mut(&mut self, coord: Coordinate) -> Option<&mut Cell> {
        let index = self.grid_coordinate_to_index(coord)?;
        self.cells.get_mut(index)
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        (coord.row as usize) < self.dimension && (coord.col as usize) < self.dimension
    }

    /// Convert a grid coordinate to a one dimensional row major index in the range 0..grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.dimension + coord.col as usize)
        } else {
            None
        }
    }

    /// Cells that are to the North, South, East or West of a particular cell (in that order), but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        if !self.is_valid_coordinate(coord) {
            return CoordinateSmallVec::new();
        }
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Coordinate,
                                  direction: CompassPrimary)
                                  -> Option<Coordinate> {
        coord.offset(direction)
             .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// The direction to travel from `a` to reach the adjacent cell `b`.
    pub fn direction_between(&self, a: Coordinate, b: Coordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| self.neighbour_at_direction(a, *dir) == Some(b))
    }

    /// Link two adjacent cells, removing the wall on both sides.
    ///
    /// Linking already linked cells changes nothing.
    pub fn link(&mut self, a: Coordinate, b: Coordinate) -> Result<(), CellLinkError> {
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return Err(CellLinkError::InvalidGridCoordinate);
        }
        let dir = self.direction_between(a, b).ok_or(CellLinkError::NotAdjacent)?;

        if let Some(cell) = self.cell_mut(a) {
            cell.remove_wall(dir);
        }
        if let Some(cell) = self.cell_mut(b) {
            cell.remove_wall(dir.opposite());
        }
        Ok(())
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: Coordinate, b: Coordinate) -> bool {
        match (self.cell(a), self.direction_between(a, b)) {
            (Some(cell), Some(dir)) => !cell.has_wall(dir),
            _ => false,
        }
    }

    pub fn is_neighbour_linked(&self, coord: Coordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Cells that are linked to a particular cell by a passage, in North, South, East, West order.
    pub fn links(&self, coord: Coordinate) -> Option<CoordinateSmallVec> {
        self.cell(coord).map(|cell| {
            cell.open_directions()
                .iter()
                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                .collect()
        })
    }

    /// Every passage exactly once, as the pair of cells it joins.
    pub fn iter_links(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        self.cells.iter().flat_map(move |cell| {
            let coord = cell.coordinate();
            [CompassPrimary::South, CompassPrimary::East]
                .into_iter()
                .filter(move |dir| !cell.has_wall(*dir))
                .filter_map(move |dir| self.neighbour_at_direction(coord, dir))
                .map(move |neighbour| (coord, neighbour))
        })
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// The open passages as an undirected graph. Node indices are the row major cell indices.
    pub fn passage_graph(&self) -> UnGraph<Coordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_links() {
            let a_index = NodeIndex::new(self.row_major_index(a));
            let b_index = NodeIndex::new(self.row_major_index(b));
            let _ = graph.add_edge(a_index, b_index, ());
        }
        graph
    }

    /// Do the passages form a spanning tree: every cell reachable from every other cell by exactly one
    /// simple path.
    pub fn is_perfect_maze(&self) -> bool {
        let mut components = UnionFind::<usize>::new(self.size());
        let mut passages = 0;
        for (a, b) in self.iter_links() {
            if !components.union(self.row_major_index(a), self.row_major_index(b)) {
                // already connected, so this passage closes a loop
                return false;
            }
            passages += 1;
        }
        passages + 1 == self.size()
    }

    #[inline]
    pub fn is_visited(&self, coord: Coordinate) -> bool {
        self.cell(coord).map_or(false, Cell::is_visited)
    }

    #[inline]
    pub fn is_on_path(&self, coord: Coordinate) -> bool {
        self.cell(coord).map_or(false, Cell::is_on_path)
    }

    pub(crate) fn set_visited(&mut self, coord: Coordinate, visited: bool) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.set_visited(visited);
        }
    }

    pub(crate) fn set_on_path(&mut self, coord: Coordinate, on_path: bool) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.set_on_path(on_path);
        }
    }

    pub(crate) fn clear_visited(&mut self) {
        for cell in &mut self.cells {
            cell.set_visited(false);
        }
    }

    pub(crate) fn clear_path(&mut self) {
        for cell in &mut self.cells {
            cell.set_on_path(false);
        }
        self.route.clear();
    }

    /// Record the route found by a solver, marking each of its cells as on the path.
    pub(crate) fn set_route(&mut self, route: Vec<Coordinate>) {
        for coord in &route {
            self.set_on_path(*coord, true);
        }
        self.route = route;
    }

    /// Discard the markers left by a solve, restoring the maze as it was generated.
    pub fn clear_markers(&mut self) {
        self.clear_visited();
        self.clear_path();
    }

    /// The solved route from start to goal in travel order, empty if the grid is unsolved.
    #[inline]
    pub fn route(&self) -> &[Coordinate] {
        &self.route
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_visited()).count()
    }

    pub fn on_path_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_on_path()).count()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            dimension: self.dimension,
            cells_count: self.size(),
        }
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter {
            current_index: 0,
            dimension: self.dimension,
        }
    }

    #[inline]
    fn row_major_index(&self, coord: Coordinate) -> usize {
        coord.row as usize * self.dimension + coord.col as usize
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    dimension: usize,
    cells_count: usize,
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Coordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = Coordinate::from_row_major_index(self.current_cell_number, self.dimension);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = Coordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_index: usize,
    dimension: usize,
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<Coordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index < self.dimension {
            let row = RowIndex(self.current_index);
            let coords = (0..self.dimension)
                .map(|i| Coordinate::from_row_column_indices(row, ColumnIndex(i)))
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.dimension - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
