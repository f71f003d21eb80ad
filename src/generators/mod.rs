use std::str::FromStr;

use rand::{Rng, SeedableRng, rngs::StdRng};

pub mod kruskal;
mod progress;
pub mod spiral;
pub mod split_tree;
pub mod sweep;
pub mod walk;
pub mod weave;

pub use kruskal::DisjointSets;
pub use progress::{LogProgress, ProgressReporter, SilentProgress, Throttle};
pub use split_tree::PathQueue;

use crate::error::{MazeError, MazeResult};
use crate::maze::Maze;
use crate::solvers::Validation;

/// Get a random number generator, optionally seeded for reproducibility.
pub(crate) fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Every carving style, keyed by the name it is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    ZigZag,
    ZagZig,
    Spiral,
    DoubleSpiral,
    Walk,
    Run,
    Kruskal,
    Weaved,
    SplitTree,
    SplitTreeV2,
    SplitTreeV3,
    KruskalWalk,
    KruskalWalk2,
    RandomTemplate,
}

impl Style {
    pub const ALL: [Style; 14] = [
        Style::ZigZag,
        Style::ZagZig,
        Style::Spiral,
        Style::DoubleSpiral,
        Style::Walk,
        Style::Run,
        Style::Kruskal,
        Style::Weaved,
        Style::SplitTree,
        Style::SplitTreeV2,
        Style::SplitTreeV3,
        Style::KruskalWalk,
        Style::KruskalWalk2,
        Style::RandomTemplate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Style::ZigZag => "zigzag",
            Style::ZagZig => "zagzig",
            Style::Spiral => "spiral",
            Style::DoubleSpiral => "double-spiral",
            Style::Walk => "walk",
            Style::Run => "run",
            Style::Kruskal => "kruskal",
            Style::Weaved => "weaved",
            Style::SplitTree => "split_tree",
            Style::SplitTreeV2 => "split_tree_v2",
            Style::SplitTreeV3 => "split_tree_v3",
            Style::KruskalWalk => "kruskal_walk",
            Style::KruskalWalk2 => "kruskal_walk2",
            Style::RandomTemplate => "random_template",
        }
    }

    pub fn from_name(name: &str) -> Option<Style> {
        Style::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Styles that stop halfway and need [`Maze::complete_generation`].
    pub fn is_two_part(self) -> bool {
        matches!(
            self,
            Style::SplitTree
                | Style::SplitTreeV2
                | Style::SplitTreeV3
                | Style::KruskalWalk
                | Style::KruskalWalk2
                | Style::RandomTemplate
        )
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Style::ZigZag => write!(f, "Row Zigzag"),
            Style::ZagZig => write!(f, "Column Zigzag"),
            Style::Spiral => write!(f, "Spiral"),
            Style::DoubleSpiral => write!(f, "Double Spiral"),
            Style::Walk => write!(f, "Random Walk"),
            Style::Run => write!(f, "Random Run"),
            Style::Kruskal => write!(f, "Kruskal's Algorithm"),
            Style::Weaved => write!(f, "Weighted Kruskal Weave"),
            Style::SplitTree => write!(f, "Split Tree (grid of mazes)"),
            Style::SplitTreeV2 => write!(f, "Split Tree (mazes of blocks)"),
            Style::SplitTreeV3 => write!(f, "Split Tree (line sketch)"),
            Style::KruskalWalk => write!(f, "Kruskal with Walks"),
            Style::KruskalWalk2 => write!(f, "Kruskal with Locked Walks"),
            Style::RandomTemplate => write!(f, "Kruskal with Random Templates"),
        }
    }
}

impl FromStr for Style {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::from_name(s).ok_or_else(|| MazeError::UnknownStyle(s.to_string()))
    }
}

/// A style, or "pick one at random".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleChoice {
    Random,
    Fixed(Style),
}

impl FromStr for StyleChoice {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "random" {
            Ok(StyleChoice::Random)
        } else {
            s.parse().map(StyleChoice::Fixed)
        }
    }
}

/// Every registered style name, in registry order.
pub fn maze_style_names() -> Vec<&'static str> {
    Style::ALL.iter().map(|s| s.name()).collect()
}

/// Creates an unconnected maze that will be carved in the named style.
pub fn new_maze(
    style_name: &str,
    height: usize,
    width: usize,
    zone: impl Into<String>,
) -> MazeResult<Maze> {
    let style: Style = style_name.parse()?;
    let mut maze = Maze::new(height, width, zone);
    maze.style = Some(style);
    Ok(maze)
}

/// [`new_maze`] with every random choice derived from `seed`.
pub fn new_seeded_maze(
    style_name: &str,
    height: usize,
    width: usize,
    zone: impl Into<String>,
    seed: u64,
) -> MazeResult<Maze> {
    let style: Style = style_name.parse()?;
    let mut maze = Maze::with_seed(height, width, zone, seed);
    maze.style = Some(style);
    Ok(maze)
}

/// Work left over by the first half of a two-part style.
#[derive(Debug)]
pub enum Pending {
    /// Split-tree refinement of the queued corridor pieces
    Refine(PathQueue),
    /// The terminal global Kruskal pass
    JoinAll,
}

/// Where a maze is in its generation.
#[derive(Debug)]
pub enum Phase {
    NotStarted,
    Generating,
    AwaitingCompletion(Pending),
    Done,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not started",
            Phase::Generating => "generating",
            Phase::AwaitingCompletion(_) => "awaiting completion",
            Phase::Done => "done",
        }
    }
}

impl Maze {
    pub fn style(&self) -> Option<Style> {
        self.style
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_two_part(&self) -> bool {
        self.style.is_some_and(Style::is_two_part)
    }

    /// Runs the style's first (for most styles, only) phase.
    ///
    /// A failed run leaves the maze in [`Phase::Generating`]; build a new maze to retry.
    ///
    /// # Errors
    /// * `MazeError::NoStyle` if the maze was built without a style
    /// * `MazeError::PhaseMismatch` unless generation has not started
    /// * whatever the carving algorithm reports
    pub fn start_generation(&mut self, progress: &mut dyn ProgressReporter) -> MazeResult<()> {
        let style = self.style.ok_or(MazeError::NoStyle)?;
        if !matches!(self.phase, Phase::NotStarted) {
            return Err(MazeError::PhaseMismatch {
                expected: Phase::NotStarted.name(),
                found: self.phase.name(),
            });
        }
        self.phase = Phase::Generating;
        tracing::debug!(
            "[generate] {} on a {}x{} maze in zone '{}'",
            style.name(),
            self.height(),
            self.width(),
            self.zone()
        );

        let mut throttle = Throttle::new(progress);
        let pending = match style {
            Style::ZigZag => sweep::zigzag(self).map(|_| None),
            Style::ZagZig => sweep::zagzig(self).map(|_| None),
            Style::Spiral => spiral::mono_spiral(self).map(|_| None),
            Style::DoubleSpiral => spiral::bi_spiral(self).map(|_| None),
            Style::Walk => walk::walk_connect_all(self, &mut throttle).map(|_| None),
            Style::Run => walk::run_connect_all(self, &mut throttle).map(|_| None),
            Style::Kruskal => kruskal::kruskal(self, &mut throttle).map(|_| None),
            Style::Weaved => {
                let count = self.size() / self.config().weave_density.max(1);
                weave::kruskal_weave(self, count, &mut throttle).map(|_| None)
            }
            Style::SplitTree => split_tree::split_tree_v1(self).map(|q| Some(Pending::Refine(q))),
            Style::SplitTreeV2 => {
                split_tree::split_tree_v2(self).map(|q| Some(Pending::Refine(q)))
            }
            Style::SplitTreeV3 => split_tree::split_tree_v3(self, &mut throttle)
                .map(|q| Some(Pending::Refine(q))),
            Style::KruskalWalk => weave::kruskal_with_walks(self).map(|_| Some(Pending::JoinAll)),
            Style::KruskalWalk2 => {
                weave::kruskal_with_walks2(self).map(|_| Some(Pending::JoinAll))
            }
            Style::RandomTemplate => {
                weave::random_templates(self).map(|_| Some(Pending::JoinAll))
            }
        }?;
        throttle.finish();

        self.phase = match pending {
            Some(pending) => Phase::AwaitingCompletion(pending),
            None => Phase::Done,
        };
        tracing::debug!("[generate] {} is {}", style.name(), self.phase.name());
        Ok(())
    }

    /// Runs the second phase of a two-part style.
    ///
    /// # Errors
    /// `MazeError::PhaseMismatch` unless the first phase left work pending.
    pub fn complete_generation(&mut self, progress: &mut dyn ProgressReporter) -> MazeResult<()> {
        let pending = match std::mem::replace(&mut self.phase, Phase::Generating) {
            Phase::AwaitingCompletion(pending) => pending,
            other => {
                let found = other.name();
                self.phase = other;
                return Err(MazeError::PhaseMismatch {
                    expected: "awaiting completion",
                    found,
                });
            }
        };

        let mut throttle = Throttle::new(progress);
        match pending {
            Pending::Refine(queue) => split_tree::split_tree_again(self, queue, &mut throttle)?,
            Pending::JoinAll => kruskal::join_all(self, &mut throttle)?,
        }
        throttle.finish();
        self.phase = Phase::Done;
        tracing::debug!("[generate] completed");
        Ok(())
    }

    /// Carves the whole maze in one call and returns the style that was used.
    ///
    /// Picks a style at random for [`StyleChoice::Random`], runs both phases of two-part
    /// styles and finishes with a validation pass that logs a warning on imperfect results.
    pub fn connect_all(
        &mut self,
        choice: StyleChoice,
        progress: &mut dyn ProgressReporter,
    ) -> MazeResult<Style> {
        let style = match choice {
            StyleChoice::Random => {
                let index = self.rng().random_range(0..Style::ALL.len());
                Style::ALL[index]
            }
            StyleChoice::Fixed(style) => style,
        };
        self.style = Some(style);
        self.start_generation(progress)?;
        if matches!(self.phase, Phase::AwaitingCompletion(_)) {
            self.complete_generation(progress)?;
        }
        self.check_generated()?;
        Ok(style)
    }

    fn check_generated(&mut self) -> MazeResult<Validation> {
        let validation = self.validate()?;
        if validation.is_perfect() {
            tracing::debug!("[validate] spanning tree over {} cells", validation.total);
        } else {
            tracing::warn!(
                "[validate] {} cycles, {}/{} cells reachable",
                validation.cycles,
                validation.reachable,
                validation.total
            );
        }
        Ok(validation)
    }
}
