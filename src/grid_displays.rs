use std::fmt;

use crate::cells::{CompassPrimary, Coordinate};
use crate::grid::Grid;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: &Grid, _: Coordinate) -> String {
        String::from("   ")
    }
}

/// Empty cell bodies, walls only.
#[derive(Debug, Copy, Clone)]
pub struct WallsDisplay;
impl GridDisplay for WallsDisplay {}

/// Marks the cells of the solved route.
#[derive(Debug, Copy, Clone)]
pub struct PathDisplay;
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, grid: &Grid, coord: Coordinate) -> String {
        if grid.is_on_path(coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

/// Marks the solved route and, more faintly, every other cell the solver looked at.
#[derive(Debug, Copy, Clone)]
pub struct ExplorationDisplay;
impl GridDisplay for ExplorationDisplay {
    fn render_cell_body(&self, grid: &Grid, coord: Coordinate) -> String {
        if grid.is_on_path(coord) {
            String::from(" . ")
        } else if grid.is_visited(coord) {
            String::from(" , ")
        } else {
            String::from("   ")
        }
    }
}

/// Shows 'S' on the start cell and 'E' on the goal cell, deferring to another display elsewhere.
#[derive(Debug, Copy, Clone)]
pub struct StartEndPointsDisplay<D: GridDisplay> {
    inner: D,
}
impl<D: GridDisplay> StartEndPointsDisplay<D> {
    pub fn new(inner: D) -> StartEndPointsDisplay<D> {
        StartEndPointsDisplay { inner }
    }
}
impl<D: GridDisplay> GridDisplay for StartEndPointsDisplay<D> {
    fn render_cell_body(&self, grid: &Grid, coord: Coordinate) -> String {
        if coord == grid.start() {
            String::from(" S ")
        } else if coord == grid.goal() {
            String::from(" E ")
        } else {
            self.inner.render_cell_body(grid, coord)
        }
    }
}

const WALL_L: &str = "╴";
const WALL_R: &str = "╶";
const WALL_U: &str = "╵";
const WALL_D: &str = "╷";
const WALL_LR_3: &str = "───";
const WALL_LR: &str = "─";
const WALL_UD: &str = "│";
const WALL_LD: &str = "┐";
const WALL_RU: &str = "└";
const WALL_LU: &str = "┘";
const WALL_RD: &str = "┌";
const WALL_LRU: &str = "┴";
const WALL_LRD: &str = "┬";
const WALL_LRUD: &str = "┼";
const WALL_RUD: &str = "├";
const WALL_LUD: &str = "┤";

/// Draw the maze walls with box drawing characters, filling each cell body from `display`.
pub fn render_text(grid: &Grid, display: &dyn GridDisplay) -> String {

    let columns_count = grid.dimension();
    let rows_count = columns_count;

    // Start by special case rendering the text for the north most boundary
    let mut output = String::from(WALL_RD);
    if let Some(first_grid_row) = grid.iter_row().next() {
        for (index, coord) in first_grid_row.iter().enumerate() {
            output.push_str(WALL_LR_3);
            let is_east_open = grid.is_neighbour_linked(*coord, CompassPrimary::East);
            if is_east_open {
                output.push_str(WALL_LR);
            } else {
                let is_last_cell = index == columns_count - 1;
                if is_last_cell {
                    output.push_str(WALL_LD);
                } else {
                    output.push_str(WALL_LRD);
                }
            }
        }
    }
    output.push('\n');

    for (index_row, row) in grid.iter_row().enumerate() {

        let is_last_row = index_row == (rows_count - 1);

        // Starts of by special case rendering the west most boundary of the row
        // The top section of the cell is done by the previous row.
        let mut row_middle_section_render = String::from(WALL_UD);
        let mut row_bottom_section_render = String::new();

        for (index_column, cell_coord) in row.into_iter().enumerate() {

            let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                if grid.is_neighbour_linked(cell_coord, direction) {
                    passage_clear_text
                } else {
                    blocking_wall_text
                }
            };
            let is_first_column = index_column == 0;
            let is_last_column = index_column == (columns_count - 1);
            let east_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::East);
            let south_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::South);

            // Each cell will simply use the southern wall of the cell above
            // it as its own northern wall, so we only need to worry about the cell’s body (room space),
            // its eastern boundary ('|'), and its southern boundary ('---+') minus the south west corner.
            let body = display.render_cell_body(grid, cell_coord);
            let east_boundary = render_cell_side(CompassPrimary::East, " ", WALL_UD);
            row_middle_section_render.push_str(&body);
            row_middle_section_render.push_str(east_boundary);

            if is_first_column {
                row_bottom_section_render = if is_last_row {
                    String::from(WALL_RU)
                } else if south_open {
                    String::from(WALL_UD)
                } else {
                    String::from(WALL_RUD)
                };
            }
            let south_boundary = render_cell_side(CompassPrimary::South, "   ", WALL_LR_3);
            row_bottom_section_render.push_str(south_boundary);

            let corner = match (is_last_row, is_last_column) {
                (true, true) => WALL_LU,
                (true, false) => {
                    if east_open {
                        WALL_LR
                    } else {
                        WALL_LRU
                    }
                }
                (false, true) => {
                    if south_open {
                        WALL_UD
                    } else {
                        WALL_LUD
                    }
                }
                (false, false) => {
                    let access_se_from_east =
                        grid.neighbour_at_direction(cell_coord, CompassPrimary::East)
                            .map_or(false,
                                    |c| grid.is_neighbour_linked(c, CompassPrimary::South));
                    let access_se_from_south =
                        grid.neighbour_at_direction(cell_coord, CompassPrimary::South)
                            .map_or(false,
                                    |c| grid.is_neighbour_linked(c, CompassPrimary::East));
                    let show_right_section = !access_se_from_east;
                    let show_down_section = !access_se_from_south;
                    let show_up_section = !east_open;
                    let show_left_section = !south_open;

                    match (show_left_section,
                           show_right_section,
                           show_up_section,
                           show_down_section) {
                        (true, true, true, true) => WALL_LRUD,
                        (true, true, true, false) => WALL_LRU,
                        (true, true, false, true) => WALL_LRD,
                        (true, false, true, true) => WALL_LUD,
                        (false, true, true, true) => WALL_RUD,
                        (true, true, false, false) => WALL_LR,
                        (false, false, true, true) => WALL_UD,
                        (false, true, true, false) => WALL_RU,
                        (true, false, false, true) => WALL_LD,
                        (true, false, true, false) => WALL_LU,
                        (false, true, false, true) => WALL_RD,
                        (true, false, false, false) => WALL_L,
                        (false, true, false, false) => WALL_R,
                        (false, false, true, false) => WALL_U,
                        (false, false, false, true) => WALL_D,
                        _ => " ",
                    }
                }
            };

            row_bottom_section_render.push_str(corner);
        }

        output.push_str(&row_middle_section_render);
        output.push('\n');
        output.push_str(&row_bottom_section_render);
        output.push('\n');
    }

    output
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let display = StartEndPointsDisplay::new(PathDisplay);
        write!(f, "{}", render_text(self, &display))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::pathing::{solve, SolverStrategy};

    fn gc(row: u32, col: u32) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn single_walled_cell() {
        let g = Grid::new(1).unwrap();
        assert_eq!(render_text(&g, &WallsDisplay), "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn two_by_two_snake() {
        let mut g = Grid::new(2).unwrap();
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(0, 1), gc(1, 1)).unwrap();
        g.link(gc(1, 1), gc(1, 0)).unwrap();

        let expected = "┌───────┐\n\
                        │       │\n\
                        ├───╴   │\n\
                        │       │\n\
                        └───────┘\n";
        assert_eq!(render_text(&g, &WallsDisplay), expected);
    }

    #[test]
    fn solved_route_is_marked() {
        let mut g = Grid::new(2).unwrap();
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(0, 1), gc(1, 1)).unwrap();
        g.link(gc(1, 1), gc(1, 0)).unwrap();
        let solved = solve(g, SolverStrategy::Bfs).unwrap();

        let text = render_text(&solved, &PathDisplay);
        assert_eq!(text.matches(" . ").count(), 3);

        let with_markers = solved.to_string();
        assert!(with_markers.contains(" S "));
        assert!(with_markers.contains(" E "));
        assert_eq!(with_markers.matches(" . ").count(), 1);
    }

    #[test]
    fn explored_cells_are_marked() {
        let mut g = Grid::new(2).unwrap();
        g.link(gc(0, 0), gc(0, 1)).unwrap();
        g.link(gc(0, 0), gc(1, 0)).unwrap();
        g.link(gc(1, 0), gc(1, 1)).unwrap();
        // breadth first reaches (0,1) while looking for the goal via (1,0)
        let solved = solve(g, SolverStrategy::Bfs).unwrap();

        let text = render_text(&solved, &ExplorationDisplay);
        assert_eq!(text.matches(" . ").count(), 3);
        assert_eq!(text.matches(" , ").count(), 1);
    }
}
