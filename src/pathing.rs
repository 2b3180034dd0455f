//! Route finding from the top left cell of a maze to the bottom right cell.
//!
//! Every strategy follows the same contract: on success the cells of one route from start to goal
//! are marked as on the path (and recorded in order, see `Grid::route`), and every cell the strategy
//! examined is marked as visited. Walls are never touched.
//! Neighbours are always considered in North, South, East, West order, which makes the exploration
//! of each strategy reproducible for a given maze.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::MazeError;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

/// The closed set of search disciplines a maze can be solved with.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum SolverStrategy {
    /// Dijkstra's algorithm over passages of equal weight.
    ShortestPath,
    /// Breadth first search with a FIFO queue.
    Bfs,
    /// Depth first search with a LIFO stack.
    Dfs,
    /// Depth first search that marks the path as it goes and unmarks dead ends when backtracking.
    RecursiveBacktrack,
}

impl SolverStrategy {
    pub const ALL: [SolverStrategy; 4] = [SolverStrategy::ShortestPath,
                                          SolverStrategy::Bfs,
                                          SolverStrategy::Dfs,
                                          SolverStrategy::RecursiveBacktrack];

    pub fn name(&self) -> &'static str {
        match *self {
            SolverStrategy::ShortestPath => "dijkstra",
            SolverStrategy::Bfs => "bfs",
            SolverStrategy::Dfs => "dfs",
            SolverStrategy::RecursiveBacktrack => "recursive",
        }
    }

    /// Does the strategy always find a route with the fewest steps.
    /// In a perfect maze there is only one route anyway, the difference shows on grids with loops.
    pub fn guarantees_shortest(&self) -> bool {
        match *self {
            SolverStrategy::ShortestPath | SolverStrategy::Bfs => true,
            SolverStrategy::Dfs | SolverStrategy::RecursiveBacktrack => false,
        }
    }
}

impl fmt::Display for SolverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SolverStrategy {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<SolverStrategy, MazeError> {
        match s.trim().to_lowercase().as_str() {
            "dijkstra" | "shortest-path" => Ok(SolverStrategy::ShortestPath),
            "bfs" => Ok(SolverStrategy::Bfs),
            "dfs" => Ok(SolverStrategy::Dfs),
            "recursive" | "recursive-backtrack" => Ok(SolverStrategy::RecursiveBacktrack),
            _ => Err(MazeError::InvalidStrategy(s.to_owned())),
        }
    }
}

/// Solve the maze with the given strategy, handing back the annotated grid.
///
/// Any markers from an earlier solve are discarded first.
/// Fails with `MazeError::NoPathFound` if the goal cannot be reached, the grid is dropped in that case.
pub fn solve(grid: Grid, strategy: SolverStrategy) -> Result<Grid, MazeError> {
    let mut grid = grid;
    solve_in_place(&mut grid, strategy)?;
    Ok(grid)
}

/// As `solve`, but borrowing the grid. On failure no cell is left marked as on the path.
pub fn solve_in_place(grid: &mut Grid, strategy: SolverStrategy) -> Result<(), MazeError> {
    grid.clear_markers();

    let route_result = match strategy {
        SolverStrategy::ShortestPath => dijkstra(grid),
        SolverStrategy::Bfs => breadth_first(grid),
        SolverStrategy::Dfs => depth_first(grid),
        SolverStrategy::RecursiveBacktrack => recursive_backtrack(grid),
    };

    match route_result {
        Ok(route) => {
            debug!("{} solver found a route of {} cells after visiting {} of {} cells",
                   strategy,
                   route.len(),
                   grid.visited_count(),
                   grid.size());
            grid.set_route(route);
            Ok(())
        }
        Err(e) => {
            debug!("{} solver failed: {}", strategy, e);
            grid.clear_path();
            Err(e)
        }
    }
}

fn no_path(grid: &Grid) -> MazeError {
    MazeError::NoPathFound {
        start: grid.start(),
        goal: grid.goal(),
    }
}

/// Open neighbours of a cell that no search has reached yet, in compass order.
fn unvisited_links(grid: &Grid, coord: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
    grid.links(coord)
        .unwrap_or_default()
        .into_iter()
        .filter(move |link| !grid.is_visited(*link))
}

/// Walk the predecessor links back from the goal, giving the route in start to goal order.
fn trace_route(grid: &Grid,
               predecessors: &FnvHashMap<Coordinate, Coordinate>)
               -> Result<Vec<Coordinate>, MazeError> {
    let start = grid.start();
    let mut current = grid.goal();
    let mut route = vec![current];

    while current != start {
        current = *predecessors.get(&current).ok_or_else(|| no_path(grid))?;
        route.push(current);
        if route.len() > grid.size() {
            // predecessors can only ever form a tree, anything longer is a broken map
            return Err(no_path(grid));
        }
    }

    route.reverse();
    Ok(route)
}

/// Dijkstra's shortest path with a binary heap frontier keyed by distance from the start.
///
/// Every passage has the same weight so the outcome matches a breadth first search, but the
/// frontier is a priority queue and cells are settled (visited) when popped at their final distance.
/// Equal distances are popped in insertion order.
fn dijkstra(grid: &mut Grid) -> Result<Vec<Coordinate>, MazeError> {
    let start = grid.start();
    let goal = grid.goal();

    let mut distances: FnvHashMap<Coordinate, usize> = utils::fnv_hashmap(grid.size());
    let mut predecessors: FnvHashMap<Coordinate, Coordinate> = utils::fnv_hashmap(grid.size());
    let mut frontier = BinaryHeap::new();
    let mut insertion_sequence = 0usize;

    distances.insert(start, 0);
    frontier.push(Reverse((0usize, insertion_sequence, start)));

    while let Some(Reverse((distance, _, current))) = frontier.pop() {
        if grid.is_visited(current) {
            // stale entry, already settled at a shorter distance
            continue;
        }
        grid.set_visited(current, true);

        if current == goal {
            return trace_route(grid, &predecessors);
        }

        let next_distance = distance + 1;
        let links = unvisited_links(grid, current).collect::<Vec<_>>();
        for link in links {
            let improved = distances.get(&link).map_or(true, |&known| next_distance < known);
            if improved {
                distances.insert(link, next_distance);
                predecessors.insert(link, current);
                insertion_sequence += 1;
                frontier.push(Reverse((next_distance, insertion_sequence, link)));
            }
        }
    }

    Err(no_path(grid))
}

/// Breadth first search, expanding the maze in layers of equal distance from the start.
///
/// Cells are marked visited when first discovered and never queued twice, so the first discoverer of
/// each cell is its predecessor on a shortest route.
fn breadth_first(grid: &mut Grid) -> Result<Vec<Coordinate>, MazeError> {
    let start = grid.start();
    let goal = grid.goal();

    let mut predecessors: FnvHashMap<Coordinate, Coordinate> = utils::fnv_hashmap(grid.size());
    let mut frontier = VecDeque::new();
    grid.set_visited(start, true);
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            return trace_route(grid, &predecessors);
        }

        let links = unvisited_links(grid, current).collect::<Vec<_>>();
        for link in links {
            grid.set_visited(link, true);
            predecessors.insert(link, current);
            frontier.push_back(link);
        }
    }

    Err(no_path(grid))
}

/// Depth first search with an explicit stack, following one branch to its end before trying another.
///
/// A cell is visited when popped; the cell that pushed it becomes its predecessor. The route found is
/// valid but not necessarily the shortest.
fn depth_first(grid: &mut Grid) -> Result<Vec<Coordinate>, MazeError> {
    let start = grid.start();
    let goal = grid.goal();

    let mut predecessors: FnvHashMap<Coordinate, Coordinate> = utils::fnv_hashmap(grid.size());
    let mut frontier: Vec<(Coordinate, Option<Coordinate>)> = vec![(start, None)];

    while let Some((current, parent)) = frontier.pop() {
        if grid.is_visited(current) {
            continue;
        }
        grid.set_visited(current, true);
        if let Some(parent_coord) = parent {
            predecessors.insert(current, parent_coord);
        }

        if current == goal {
            return trace_route(grid, &predecessors);
        }

        // reversed so that the first compass direction is popped, and so explored, first
        let links = unvisited_links(grid, current).collect::<Vec<_>>();
        frontier.extend(links.into_iter().rev().map(|link| (link, Some(current))));
    }

    Err(no_path(grid))
}

#[derive(Debug, Copy, Clone)]
struct BacktrackFrame {
    coordinate: Coordinate,
    next_direction: usize,
}

impl BacktrackFrame {
    fn new(coordinate: Coordinate) -> BacktrackFrame {
        BacktrackFrame {
            coordinate,
            next_direction: 0,
        }
    }

    /// Advance to the next open, unvisited neighbour of this frame's cell.
    fn next_unexplored(&mut self, grid: &Grid) -> Option<Coordinate> {
        while let Some(&dir) = CompassPrimary::ALL.get(self.next_direction) {
            self.next_direction += 1;
            if grid.is_neighbour_linked(self.coordinate, dir) {
                let neighbour = grid.neighbour_at_direction(self.coordinate, dir);
                if let Some(coord) = neighbour.filter(|c| !grid.is_visited(*c)) {
                    return Some(coord);
                }
            }
        }
        None
    }
}

/// Recursive backtracking solver.
///
/// Each step onto a cell marks it as on the path; when a cell runs out of unexplored passages it is
/// unmarked again and the search returns to the previous cell. When the goal is reached the marked
/// cells are exactly the route. The recursion is kept on a heap allocated stack of frames, one per
/// cell on the current path, each remembering which direction to try next.
fn recursive_backtrack(grid: &mut Grid) -> Result<Vec<Coordinate>, MazeError> {
    let start = grid.start();
    let goal = grid.goal();

    grid.set_visited(start, true);
    grid.set_on_path(start, true);
    let mut stack = vec![BacktrackFrame::new(start)];

    while let Some(current) = stack.last().map(|frame| frame.coordinate) {
        if current == goal {
            return Ok(stack.iter().map(|frame| frame.coordinate).collect());
        }

        let next = stack.last_mut().and_then(|frame| frame.next_unexplored(grid));
        match next {
            Some(coord) => {
                grid.set_visited(coord, true);
                grid.set_on_path(coord, true);
                stack.push(BacktrackFrame::new(coord));
            }
            None => {
                grid.set_on_path(current, false);
                stack.pop();
            }
        }
    }

    Err(no_path(grid))
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::generate_seeded;
    use fnv::FnvHashSet;
    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};

    fn gc(row: u32, col: u32) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn walls(grid: &Grid) -> Vec<Vec<CompassPrimary>> {
        grid.cells().iter().map(|cell| cell.open_directions().to_vec()).collect()
    }

    /// The route runs from start to goal through linked cells without repeating any, and the on path
    /// markers are set on exactly its cells.
    fn assert_valid_route(grid: &Grid) {
        let route = grid.route();
        assert_eq!(route.first(), Some(&grid.start()));
        assert_eq!(route.last(), Some(&grid.goal()));
        for (a, b) in route.iter().tuple_windows() {
            assert!(grid.is_linked(*a, *b), "route crosses a wall between {} and {}", a, b);
        }

        let route_cells: FnvHashSet<Coordinate> = route.iter().cloned().collect();
        assert_eq!(route_cells.len(), route.len(), "route revisits a cell");
        for coord in grid.iter() {
            assert_eq!(grid.is_on_path(coord), route_cells.contains(&coord));
        }
        assert!(route.iter().all(|coord| grid.is_visited(*coord)));
    }

    /// A 3x3 grid with a single loop. Heading east from the start reaches the goal in 5 cells, heading
    /// south first winds through the centre and takes 7.
    ///
    /// (0,0) - (0,1) - (0,2)
    ///   |               |
    /// (1,0)   (1,1) - (1,2)
    ///   |       |       |
    /// (2,0) - (2,1)   (2,2)
    fn looped_grid() -> Grid {
        let mut g = Grid::new(3).unwrap();
        let passages = [(gc(0, 0), gc(0, 1)),
                        (gc(0, 1), gc(0, 2)),
                        (gc(0, 2), gc(1, 2)),
                        (gc(1, 2), gc(2, 2)),
                        (gc(0, 0), gc(1, 0)),
                        (gc(1, 0), gc(2, 0)),
                        (gc(2, 0), gc(2, 1)),
                        (gc(2, 1), gc(1, 1)),
                        (gc(1, 1), gc(1, 2))];
        for &(a, b) in passages.iter() {
            g.link(a, b).unwrap();
        }
        g
    }

    /// A 3x3 grid where the goal is walled off from the rest.
    fn disconnected_grid() -> Grid {
        let mut g = Grid::new(3).unwrap();
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(0, 1), gc(1, 1)).unwrap();
        g.link(gc(1, 1), gc(1, 0)).unwrap();
        g.link(gc(2, 2), gc(2, 1)).unwrap();
        g
    }

    #[test]
    fn parse_strategy_names() {
        assert_eq!("dijkstra".parse::<SolverStrategy>(), Ok(SolverStrategy::ShortestPath));
        assert_eq!("shortest-path".parse::<SolverStrategy>(), Ok(SolverStrategy::ShortestPath));
        assert_eq!("BFS".parse::<SolverStrategy>(), Ok(SolverStrategy::Bfs));
        assert_eq!(" dfs ".parse::<SolverStrategy>(), Ok(SolverStrategy::Dfs));
        assert_eq!("recursive".parse::<SolverStrategy>(),
                   Ok(SolverStrategy::RecursiveBacktrack));
        assert_eq!("a-star".parse::<SolverStrategy>(),
                   Err(MazeError::InvalidStrategy(String::from("a-star"))));

        for strategy in SolverStrategy::ALL.iter() {
            assert_eq!(strategy.to_string().parse::<SolverStrategy>(), Ok(*strategy));
        }
    }

    #[test]
    fn single_cell_trivial_route() {
        for strategy in SolverStrategy::ALL.iter() {
            let g = solve(generate_seeded(1, 0).unwrap(), *strategy).unwrap();
            assert_eq!(g.route(), &[gc(0, 0)]);
            assert!(g.is_on_path(gc(0, 0)));
            assert_eq!(g.on_path_count(), 1);
        }
    }

    #[test]
    fn fixed_seed_five_by_five_shortest_equivalence() {
        let maze = generate_seeded(5, 0x5eed).unwrap();
        assert!(maze.is_perfect_maze());
        assert_eq!(maze.links_count(), 24);

        let by_dijkstra = solve(maze.clone(), SolverStrategy::ShortestPath).unwrap();
        let by_bfs = solve(maze, SolverStrategy::Bfs).unwrap();
        assert_valid_route(&by_dijkstra);
        assert_valid_route(&by_bfs);
        assert_eq!(by_dijkstra.route().last(), Some(&gc(4, 4)));
        assert_eq!(by_dijkstra.route().len(), by_bfs.route().len());
    }

    #[test]
    fn every_strategy_finds_a_valid_route() {
        let maze = generate_seeded(15, 2024).unwrap();
        for strategy in SolverStrategy::ALL.iter() {
            let solved = solve(maze.clone(), *strategy).unwrap();
            assert_valid_route(&solved);
        }
    }

    #[test]
    fn solving_never_changes_walls() {
        let maze = generate_seeded(10, 5).unwrap();
        let layout = walls(&maze);
        for strategy in SolverStrategy::ALL.iter() {
            let solved = solve(maze.clone(), *strategy).unwrap();
            assert_eq!(walls(&solved), layout);
        }
    }

    #[test]
    fn resolving_replaces_earlier_markers() {
        let maze = generate_seeded(10, 11).unwrap();
        let by_dfs = solve(maze, SolverStrategy::Dfs).unwrap();
        let by_bfs = solve(by_dfs, SolverStrategy::Bfs).unwrap();
        assert_valid_route(&by_bfs);

        let mut reset = by_bfs.clone();
        reset.clear_markers();
        assert_eq!(reset.visited_count(), 0);
        assert_eq!(reset.on_path_count(), 0);
    }

    #[test]
    fn looped_grid_shortest_routes() {
        let g = looped_grid();
        assert!(!g.is_perfect_maze());

        let by_dijkstra = solve(g.clone(), SolverStrategy::ShortestPath).unwrap();
        let by_bfs = solve(g, SolverStrategy::Bfs).unwrap();
        let eastern_route = [gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 2), gc(2, 2)];
        assert_valid_route(&by_dijkstra);
        assert_valid_route(&by_bfs);
        assert_eq!(by_dijkstra.route(), &eastern_route);
        assert_eq!(by_bfs.route(), &eastern_route);
    }

    #[test]
    fn looped_grid_depth_first_routes_are_valid_not_shortest() {
        // South is tried before east from the start, so both depth first strategies wind through the
        // centre. That is a property of the strategies, not a failure.
        let winding_route = [gc(0, 0), gc(1, 0), gc(2, 0), gc(2, 1), gc(1, 1), gc(1, 2), gc(2, 2)];
        for strategy in [SolverStrategy::Dfs, SolverStrategy::RecursiveBacktrack].iter() {
            assert!(!strategy.guarantees_shortest());
            let solved = solve(looped_grid(), *strategy).unwrap();
            assert_valid_route(&solved);
            assert_eq!(solved.route(), &winding_route);
        }
    }

    #[test]
    fn recursive_backtrack_unmarks_dead_ends() {
        // From (1,2) north is tried before south, leading into the dead end (0,2) - (0,1) whose cells
        // must be left visited but no longer on the path.
        let solved = solve(looped_grid(), SolverStrategy::RecursiveBacktrack).unwrap();
        assert!(solved.is_visited(gc(0, 2)));
        assert!(solved.is_visited(gc(0, 1)));
        assert!(!solved.is_on_path(gc(0, 2)));
        assert!(!solved.is_on_path(gc(0, 1)));
        assert_eq!(solved.on_path_count(), 7);
        assert_eq!(solved.visited_count(), 9);
    }

    #[test]
    fn disconnected_grid_has_no_path() {
        let expected = MazeError::NoPathFound {
            start: gc(0, 0),
            goal: gc(2, 2),
        };
        for strategy in SolverStrategy::ALL.iter() {
            let mut g = disconnected_grid();
            assert_eq!(solve_in_place(&mut g, *strategy), Err(expected.clone()));
            assert_eq!(g.on_path_count(), 0);
            assert!(g.route().is_empty());
            // the whole reachable region was searched and nothing beyond it
            assert!(g.is_visited(gc(1, 0)));
            assert!(!g.is_visited(gc(2, 1)));

            assert_eq!(solve(disconnected_grid(), *strategy).unwrap_err(), expected);
        }
    }

    #[test]
    fn quickcheck_routes_valid_and_shortest_agree() {
        fn routes(n: u8, seed: u64) -> TestResult {
            let dimension = (n % 20) as usize + 1;
            let maze = generate_seeded(dimension, seed).unwrap();

            let mut lengths = Vec::new();
            for strategy in SolverStrategy::ALL.iter() {
                let solved = match solve(maze.clone(), *strategy) {
                    Ok(solved) => solved,
                    Err(_) => return TestResult::failed(),
                };
                assert_valid_route(&solved);
                if strategy.guarantees_shortest() {
                    lengths.push(solved.route().len());
                }
            }
            TestResult::from_bool(lengths.iter().all_equal())
        }
        quickcheck(routes as fn(u8, u64) -> TestResult);
    }
}
