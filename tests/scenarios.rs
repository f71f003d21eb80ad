use weavemaze::generators::{PathQueue, Phase, weave};
use weavemaze::geometry::{Line, LineLike, LineLikeCollection, Point};
use weavemaze::text::TextView;
use weavemaze::{
    Coord, Direction, Maze, MazeError, SilentProgress, new_seeded_maze, maze_style_names,
};

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
    Line::new(Point::new(x1, y1), Point::new(x2, y2))
}

#[test]
fn test_zigzag_five_by_ten() {
    let mut maze = new_seeded_maze("zigzag", 5, 10, "T", 1).unwrap();
    maze.start_generation(&mut SilentProgress).unwrap();
    assert!(matches!(maze.phase(), Phase::Done));

    let first = Coord::new(0, 0);
    assert_eq!(
        maze.neighbors(first).unwrap(),
        vec![maze.get(Coord::new(0, 1)).unwrap().id()]
    );
    maze.color_from(1, first).unwrap();
    assert_eq!(maze.all_with_color(1).len(), 50);
}

#[test]
fn test_color_from_refuses_a_painted_color() {
    let mut maze = new_seeded_maze("kruskal", 6, 6, "T", 4).unwrap();
    maze.start_generation(&mut SilentProgress).unwrap();
    assert_eq!(maze.color_from(3, Coord::new(2, 2)), Ok(0));
    for cell in maze.surface_cells() {
        assert_eq!(maze.color(cell.id()), 3);
    }
    assert_eq!(
        maze.color_from(3, Coord::new(0, 0)),
        Err(MazeError::ColorInUse(3))
    );
}

#[test]
fn test_add_then_remove_door() {
    let mut maze = Maze::with_seed(4, 4, "T", 1);
    maze.add_door(Coord::new(1, 1), Direction::North).unwrap();
    maze.add_door(Coord::new(1, 1), Direction::East).unwrap();
    let before: Vec<usize> = maze.surface_cells().iter().map(|c| c.door_count()).collect();

    maze.add_door(Coord::new(1, 1), Direction::South).unwrap();
    assert!(maze.get(Coord::new(2, 1)).unwrap().has_door(Direction::North));
    maze.remove_door(Coord::new(1, 1), Direction::South).unwrap();

    let after: Vec<usize> = maze.surface_cells().iter().map(|c| c.door_count()).collect();
    assert_eq!(before, after);
    assert!(!maze.get(Coord::new(1, 1)).unwrap().has_door(Direction::South));
    assert!(!maze.get(Coord::new(2, 1)).unwrap().has_door(Direction::North));
    assert!(maze.get(Coord::new(1, 1)).unwrap().has_door(Direction::North));
}

#[test]
fn test_out_of_bounds_access() {
    let mut maze = Maze::with_seed(3, 3, "T", 1);
    assert!(matches!(
        maze.add_door(Coord::new(0, 2), Direction::East),
        Err(MazeError::OutOfBounds { .. })
    ));
    assert!(matches!(
        maze.color_from(1, Coord::new(3, 0)),
        Err(MazeError::OutOfBounds { .. })
    ));
}

#[test]
fn test_weave_cross_on_three_by_three() {
    let mut maze = Maze::with_seed(3, 3, "T", 11);
    maze.init_disjoint_sets();
    assert!(weave::over_under_cross(&mut maze, Coord::new(1, 1)).unwrap());

    let id = |x, y| maze.id_at(Coord::new(x, y)).unwrap();
    let sets = maze.disjoint_sets().unwrap();
    assert!(sets.same_set(id(0, 1), id(2, 1)));
    assert!(sets.same_set(id(1, 0), id(1, 2)));
    assert!(!sets.same_set(id(0, 1), id(1, 0)));

    let under = maze.get(Coord::new(1, 1)).unwrap().under_cell().unwrap();
    assert_eq!(maze.cell(under).door_count(), 2);
    assert_eq!(maze.cell(under).coord(), Coord::new(1, 1));

    // Whichever axis runs over, the north and south arms stay joined and the
    // east and west arms stay apart from them.
    maze.color_from(5, Coord::new(1, 1).step(Direction::North)).unwrap();
    assert_eq!(maze.color_at(Coord::new(0, 1)), Ok(5));
    assert_eq!(maze.color_at(Coord::new(2, 1)), Ok(5));
    assert_ne!(maze.color_at(Coord::new(1, 0)), Ok(5));
    assert_ne!(maze.color_at(Coord::new(1, 2)), Ok(5));
}

#[test]
fn test_path_queue_longest_first() {
    let mut queue = PathQueue::new(100);
    for len in [3, 9, 1, 6] {
        queue.push((0..len).map(|y| Coord::new(0, y)).collect());
    }
    let lengths: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|p| p.len()).collect();
    assert_eq!(lengths, vec![9, 6, 3, 1]);
}

#[test]
fn test_crossing_pair_is_removed() {
    let apart = line(0.0, 0.0, 0.0, 4.0);
    let a = line(1.0, 1.0, 5.0, 5.0);
    let b = line(1.0, 5.0, 5.0, 1.0);
    let mut collection = LineLikeCollection::from_lines([apart, a, b]);
    assert_eq!(
        collection.crossing(),
        Some((LineLike::Line(a), LineLike::Line(b)))
    );
    assert_eq!(collection.items(), &[LineLike::Line(apart)]);
    assert_eq!(collection.crossing(), None);
    assert_eq!(collection.items(), &[LineLike::Line(apart)]);
}

#[test]
fn test_two_phase_styles() {
    for name in ["split_tree", "kruskal_walk", "kruskal_walk2", "random_template"] {
        let mut maze = new_seeded_maze(name, 20, 20, "T", 5).unwrap();
        assert!(maze.is_two_part());
        maze.start_generation(&mut SilentProgress).unwrap();
        assert!(matches!(maze.phase(), Phase::AwaitingCompletion(_)), "{name}");
        maze.complete_generation(&mut SilentProgress).unwrap();
        assert!(matches!(maze.phase(), Phase::Done), "{name}");
        assert!(maze.validate().unwrap().is_perfect(), "{name}");
    }
}

#[test]
fn test_generation_needs_a_style() {
    let mut maze = Maze::with_seed(4, 4, "T", 1);
    assert_eq!(
        maze.start_generation(&mut SilentProgress),
        Err(MazeError::NoStyle)
    );
}

#[test]
fn test_every_registered_style_builds() {
    for name in maze_style_names() {
        let maze = new_seeded_maze(name, 10, 10, "T", 2).unwrap();
        assert_eq!(maze.style().map(|s| s.name()), Some(name));
    }
}

#[test]
fn test_solution_renders_from_corner_to_corner() {
    let mut maze = new_seeded_maze("zigzag", 3, 4, "T", 1).unwrap();
    maze.start_generation(&mut SilentProgress).unwrap();
    maze.open_outer_walls().unwrap();
    let path = maze.solve(2).unwrap();
    assert_eq!(path.len(), 12);
    let text = TextView::new(&maze).with_solution(&path).to_string();
    assert_eq!(text.matches("**").count(), 12);
    assert!(text.lines().nth(1).unwrap().starts_with(' '));
    assert!(text.lines().nth(5).unwrap().ends_with(' '));
}
