use docopt::Docopt;
use log::{debug, info};
use petgraph::visit::EdgeRef;
use serde_derive::Deserialize;
use mazes::{
    generators,
    grid::Grid,
    grid_displays::{self, ExplorationDisplay, PathDisplay, StartEndPointsDisplay},
    pathing::{self, SolverStrategy},
};
use std::{
    fs::File,
    io,
    io::prelude::*,
    time::Instant,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--size=<n>] [--seed=<s>] [--solver=<name>] [--no-solve] [--show-visited] [--text-out=<path>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --size=<n>             The grid size is n * n [default: 10].
    --seed=<s>             Seed the maze generator to reproduce a maze.
    --solver=<name>        Route finding strategy: dijkstra, bfs, dfs or recursive [default: dijkstra].
    --no-solve             Only generate the maze, do not search for a route.
    --show-visited         Also mark every cell the solver explored with a ','.
    --text-out=<path>      Output file path for a textual rendering of the maze instead of stdout.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_size: usize,
    flag_seed: Option<u64>,
    flag_solver: String,
    flag_no_solve: bool,
    flag_show_visited: bool,
    flag_text_out: String,
    flag_save_edges: String,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            Io(::std::io::Error);
            Maze(::mazes::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());
    debug!("{:?}", args);

    // Reject an unknown solver before doing any work.
    let strategy: SolverStrategy = args.flag_solver.parse()?;

    let maze_grid = generate_maze(&args)?;
    info!("Generated a {0}x{0} maze with {1} passages",
          maze_grid.dimension(),
          maze_grid.links_count());

    if !args.flag_save_edges.is_empty() {

        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    let maze_grid = if args.flag_no_solve {
        maze_grid
    } else {
        solve_maze(maze_grid, strategy)?
    };

    let text = render_maze(&maze_grid, &args);
    if args.flag_text_out.is_empty() {
        print!("{}", text);
    } else {
        write_text_to_file(&text, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

fn generate_maze(maze_args: &MazeArgs) -> Result<Grid> {
    let grid = if let Some(seed) = maze_args.flag_seed {
        generators::generate_seeded(maze_args.flag_size, seed)
    } else {
        let mut rng = rand::thread_rng();
        generators::generate(maze_args.flag_size, &mut rng)
    };
    grid.chain_err(|| format!("Failed to generate a maze of size {}", maze_args.flag_size))
}

fn solve_maze(maze_grid: Grid, strategy: SolverStrategy) -> Result<Grid> {
    let start_time = Instant::now();
    let solved = pathing::solve(maze_grid, strategy)?;
    info!("Solving maze took: {} ms", start_time.elapsed().as_millis());
    info!("{} route is {} cells long, {} of {} cells explored",
          strategy,
          solved.route().len(),
          solved.visited_count(),
          solved.size());
    Ok(solved)
}

fn render_maze(maze_grid: &Grid, maze_args: &MazeArgs) -> String {
    if maze_args.flag_show_visited {
        let display = StartEndPointsDisplay::new(ExplorationDisplay);
        grid_displays::render_text(maze_grid, &display)
    } else {
        let display = StartEndPointsDisplay::new(PathDisplay);
        grid_displays::render_text(maze_grid, &display)
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let graph = maze_grid.passage_graph();
    let mut graph_data = String::new();
    graph_data.push_str(&graph.node_count().to_string());
    graph_data.push(' ');
    graph_data.push_str(&graph.edge_count().to_string());
    graph_data.push('\n');

    for edge in graph.edge_references() {
        let src_as_1_based_index = edge.source().index() + 1;
        let dst_as_1_based_index = edge.target().index() + 1;

        graph_data.push_str(&src_as_1_based_index.to_string());
        graph_data.push(' ');
        graph_data.push_str(&dst_as_1_based_index.to_string());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;
    info!("Saved {} passages to {}", graph.edge_count(), file_path);

    Ok(())
}
