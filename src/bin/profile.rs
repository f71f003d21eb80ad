use std::time::{Duration, Instant};

use clap::Parser;
use weavemaze::{Maze, SilentProgress, Style, StyleChoice};

/// Times maze generation for every style, or one.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Style to time; every style when absent
    #[arg(short, long)]
    style: Option<Style>,

    #[arg(long, default_value_t = 100)]
    height: usize,

    #[arg(long, default_value_t = 100)]
    width: usize,

    /// Mazes generated per style
    #[arg(short = 'n', long, default_value_t = 10)]
    iterations: u64,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let _guard = weavemaze::logging::init(args.verbose, None);

    let styles = match args.style {
        Some(style) => vec![style],
        None => Style::ALL.to_vec(),
    };
    for style in styles {
        let mut elapsed = Duration::ZERO;
        let mut failures = 0;
        for seed in 0..args.iterations {
            let mut maze = Maze::with_seed(args.height, args.width, "profile", seed);
            let start = Instant::now();
            let result = maze.connect_all(StyleChoice::Fixed(style), &mut SilentProgress);
            elapsed += start.elapsed();
            if let Err(e) = result {
                tracing::debug!("[profile] {} seed {seed}: {e}", style.name());
                failures += 1;
            }
        }
        tracing::info!(
            "[profile] {:<16} {}x{} x{}: {:?} total, {:?} per maze, {failures} failed",
            style.name(),
            args.height,
            args.width,
            args.iterations,
            elapsed,
            elapsed / args.iterations.max(1) as u32
        );
    }
    Ok(())
}
