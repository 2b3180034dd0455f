//! Failures reported by maze generation and solving.
//!
//! All of these are precondition violations on the caller's side, nothing is retried internally.

use std::error::Error;
use std::fmt;

use crate::cells::Coordinate;

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum MazeError {
    /// A grid was requested with a side length of zero, or one too large to address.
    InvalidDimension(usize),
    /// The goal cell cannot be reached from the start cell through open passages.
    NoPathFound {
        start: Coordinate,
        goal: Coordinate,
    },
    /// A solver was selected by a name that does not match any known strategy.
    InvalidStrategy(String),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeError::InvalidDimension(dimension) => {
                write!(f, "invalid maze dimension {}, expected a positive grid size", dimension)
            }
            MazeError::NoPathFound { start, goal } => {
                write!(f, "no path found from {} to {}", start, goal)
            }
            MazeError::InvalidStrategy(ref name) => {
                write!(f,
                       "unrecognised solver strategy '{}', expected one of dijkstra, bfs, dfs or \
                        recursive",
                       name)
            }
        }
    }
}

impl Error for MazeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert!(MazeError::InvalidDimension(0).to_string().contains('0'));
        assert!(MazeError::InvalidStrategy(String::from("a-star"))
                    .to_string()
                    .contains("a-star"));

        let no_path = MazeError::NoPathFound {
            start: Coordinate::new(0, 0),
            goal: Coordinate::new(2, 2),
        };
        assert_eq!(no_path.to_string(), "no path found from (0, 0) to (2, 2)");
    }
}
