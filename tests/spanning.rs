//! Every style should carve a spanning tree: one connected piece without cycles.

use proptest::prelude::*;
use weavemaze::{Maze, SilentProgress, Style, StyleChoice};

fn carve(style: Style, height: usize, width: usize, seed: u64) -> Maze {
    let mut maze = Maze::with_seed(height, width, "spanning", seed);
    maze.connect_all(StyleChoice::Fixed(style), &mut SilentProgress)
        .unwrap_or_else(|e| panic!("{} {height}x{width} seed {seed}: {e}", style.name()));
    maze
}

fn tree_style() -> impl Strategy<Value = Style> {
    prop::sample::select(vec![
        Style::ZigZag,
        Style::ZagZig,
        Style::Spiral,
        Style::DoubleSpiral,
        Style::Walk,
        Style::Run,
        Style::Kruskal,
    ])
}

fn template_style() -> impl Strategy<Value = Style> {
    prop::sample::select(vec![
        Style::KruskalWalk,
        Style::KruskalWalk2,
        Style::RandomTemplate,
    ])
}

fn split_tree_style() -> impl Strategy<Value = Style> {
    prop::sample::select(vec![Style::SplitTree, Style::SplitTreeV2, Style::SplitTreeV3])
}

proptest! {
    #[test]
    fn test_tree_styles_span(
        style in tree_style(),
        height in 1usize..15,
        width in 1usize..15,
        seed in any::<u64>(),
    ) {
        let mut maze = carve(style, height, width, seed);
        let validation = maze.validate().unwrap();
        prop_assert_eq!(validation.cycles, 0);
        prop_assert_eq!(validation.reachable, height * width);
        prop_assert_eq!(maze.cell_count(), maze.size());
    }

    #[test]
    fn test_weave_spans_with_tunnels(
        height in 3usize..25,
        width in 3usize..25,
        seed in any::<u64>(),
    ) {
        let mut maze = carve(Style::Weaved, height, width, seed);
        let validation = maze.validate().unwrap();
        prop_assert!(validation.is_perfect(), "{:?}", validation);
        for cell in maze.surface_cells().iter().filter(|c| c.has_under_cell()) {
            prop_assert_eq!(cell.door_count(), 2);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_template_styles_span(
        style in template_style(),
        height in 8usize..20,
        width in 8usize..20,
        seed in any::<u64>(),
    ) {
        let mut maze = carve(style, height, width, seed);
        prop_assert!(maze.validate().unwrap().is_perfect());
    }

    #[test]
    fn test_split_tree_spans_or_gives_up(
        style in split_tree_style(),
        height in 10usize..30,
        width in 10usize..30,
        seed in any::<u64>(),
    ) {
        let mut maze = Maze::with_seed(height, width, "spanning", seed);
        match maze.connect_all(StyleChoice::Fixed(style), &mut SilentProgress) {
            Ok(_) => prop_assert!(maze.validate().unwrap().is_perfect()),
            Err(e) => prop_assert!(e.is_seed_dependent(), "{}", e),
        }
    }
}
