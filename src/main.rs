use std::path::PathBuf;

use clap::Parser;
use weavemaze::{LogProgress, Maze, MazeError, StyleChoice, maze_style_names, text::TextView};

/// Generates a maze and prints it as text.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Carving style, or "random"
    #[arg(short, long, default_value = "random")]
    style: String,

    /// Rows of cells
    #[arg(long, default_value_t = 15)]
    height: usize,

    /// Columns of cells
    #[arg(long, default_value_t = 25)]
    width: usize,

    /// Random seed; a fresh one is drawn when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Doors to move after carving
    #[arg(long, default_value_t = 0)]
    shuffle: usize,

    /// Open an entrance and an exit in the outer wall
    #[arg(long)]
    open: bool,

    /// Draw the route from the first cell to the last
    #[arg(long)]
    solution: bool,

    /// Color the cell bodies
    #[arg(long)]
    color: bool,

    /// List the style names and exit
    #[arg(long)]
    list: bool,

    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Further seeds to try when a seed leads nowhere
    #[arg(long, default_value_t = 5)]
    retries: u64,
}

const SOLUTION_COLOR: u32 = 9;

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let _guard = weavemaze::logging::init(args.verbose, args.log_file.as_deref());

    if args.list {
        for name in maze_style_names() {
            println!("{name}");
        }
        return Ok(());
    }
    if args.height == 0 || args.width == 0 {
        eprintln!("Height and width must be at least 1.");
        return Ok(());
    }
    let choice: StyleChoice = match args.style.parse() {
        Ok(choice) => choice,
        Err(e) => {
            eprintln!("{e}. Known styles: random, {}", maze_style_names().join(", "));
            return Ok(());
        }
    };

    let base_seed = args.seed.unwrap_or_else(rand::random);
    let mut maze = None;
    for attempt in 0..=args.retries {
        let seed = base_seed.wrapping_add(attempt);
        match generate(&args, choice, seed) {
            Ok(generated) => {
                maze = Some(generated);
                break;
            }
            Err(e) if retryable(&e, choice) => {
                tracing::warn!("[main] seed {seed} failed: {e}; trying the next one");
            }
            Err(e) => return Err(std::io::Error::other(e)),
        }
    }
    let Some(mut maze) = maze else {
        eprintln!("No seed from {base_seed} on produced a maze.");
        return Ok(());
    };

    let solution = if args.solution {
        maze.color_all(0);
        let path = maze.solve(SOLUTION_COLOR).map_err(std::io::Error::other)?;
        maze.color_all(0);
        path
    } else {
        Vec::new()
    };
    TextView::new(&maze)
        .with_solution(&solution)
        .with_color(args.color)
        .queue_to(&mut std::io::stdout())?;

    let validation = maze.validate().map_err(std::io::Error::other)?;
    println!(
        "{} {}x{}: {} cells, {} crossings, {} cycles, {}/{} reachable",
        maze.style().map_or("unstyled", |s| s.name()),
        maze.height(),
        maze.width(),
        maze.cell_count(),
        maze.cell_count() - maze.size(),
        validation.cycles,
        validation.reachable,
        validation.total
    );
    Ok(())
}

/// Carves one maze with `seed`, then shuffles and opens it as asked.
fn generate(args: &Args, choice: StyleChoice, seed: u64) -> Result<Maze, MazeError> {
    let mut maze = Maze::with_seed(args.height, args.width, "cli", seed);
    let style = maze.connect_all(choice, &mut LogProgress::new("generate"))?;
    tracing::info!("[main] carved {} with seed {seed}", style.name());
    for _ in 0..args.shuffle {
        maze.move_door()?;
    }
    if args.open {
        maze.open_outer_walls()?;
    }
    Ok(maze)
}

/// Failures worth another seed. A random pick may also land on a style the grid is too small for.
fn retryable(e: &MazeError, choice: StyleChoice) -> bool {
    e.is_seed_dependent()
        || (choice == StyleChoice::Random && matches!(e, MazeError::TooSmall { .. }))
}
