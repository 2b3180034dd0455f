use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cells::{Coordinate, CoordinateSmallVec};
use crate::errors::MazeError;
use crate::grid::Grid;

/// Generate a `dimension` * `dimension` perfect maze, drawing every random choice from `rng`.
///
/// Fails with `MazeError::InvalidDimension` before allocating if the dimension is zero.
pub fn generate<R: Rng>(dimension: usize, rng: &mut R) -> Result<Grid, MazeError> {
    let mut grid = Grid::new(dimension)?;
    recursive_backtracker(&mut grid, rng);
    debug!("Generated {0}x{0} maze with {1} passages", dimension, grid.links_count());
    Ok(grid)
}

/// Generate a maze from a fixed seed. The same seed and dimension always give the same wall layout.
pub fn generate_seeded(dimension: usize, seed: u64) -> Result<Grid, MazeError> {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    generate(dimension, &mut rng)
}

/// Apply the recursive backtracker maze generation algorithm to a fully walled grid.
///
/// Starting from the top left cell we carve a passage to a random unvisited neighbour and carry on
/// from there, going as deep as possible. When a cell has no unvisited neighbours left we backtrack
/// along the stack of cells carved so far until we find one that does.
/// A wall is only ever removed between a visited and a not yet visited cell, so no loops can form,
/// and the walk only ends once every cell has been visited: the passages form a spanning tree, i.e.
/// a perfect maze with dimension^2 - 1 passages.
///
/// Long twisty passages with few dead ends are typical of this algorithm.
/// The visited markers used while carving are cleared before returning.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid, rng: &mut R) {
    grid.clear_visited();

    let start = grid.start();
    grid.set_visited(start, true);
    let mut stack: Vec<Coordinate> = Vec::with_capacity(grid.size());
    stack.push(start);

    while let Some(&current) = stack.last() {
        let unvisited_neighbours = grid.neighbours(current)
            .into_iter()
            .filter(|coord| !grid.is_visited(*coord))
            .collect::<CoordinateSmallVec>();

        if let Some(&next) = unvisited_neighbours.choose(rng) {
            // `next` came from `grid.neighbours(current)`, so it is on the grid and adjacent
            grid.link(current, next).expect("neighbours on the grid are always linkable");
            grid.set_visited(next, true);
            stack.push(next);
        } else {
            // dead end
            stack.pop();
        }
    }

    grid.clear_visited();
}
