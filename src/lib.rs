//! **mazes** generates perfect mazes on square grids and finds the route from the top left cell to the
//! bottom right cell with one of several search strategies.
//!
//! ```
//! use mazes::{generate_seeded, solve, SolverStrategy};
//!
//! let maze = generate_seeded(5, 42).unwrap();
//! let solved = solve(maze, SolverStrategy::Bfs).unwrap();
//! assert_eq!(solved.route().first(), Some(&solved.start()));
//! assert_eq!(solved.route().last(), Some(&solved.goal()));
//! ```

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod units;
mod utils;

pub use crate::cells::{Cell, CompassPrimary, Coordinate};
pub use crate::errors::MazeError;
pub use crate::generators::{generate, generate_seeded};
pub use crate::grid::Grid;
pub use crate::pathing::{solve, solve_in_place, SolverStrategy};
