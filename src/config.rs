/// Tunables for the randomized carving styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// One weave crossing is attempted per this many cells
    pub weave_density: usize,
    /// Number of templates stamped by the walk and random-template styles
    pub template_count: usize,
    /// Step limit of a walk template
    pub walk_limit: usize,
    /// Step limit of a run template
    pub run_limit: usize,
    /// Step limit of a split-tree side branch
    pub branch_limit: usize,
    /// Interior points in the split-tree v3 sketch
    pub sketch_points: usize,
    /// Divisor used to lay out the split-tree grid of sub-mazes
    pub block_factor: usize,
    /// Upper bound on crossings resolved while uncrossing a sketch
    pub uncross_rounds: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            weave_density: 50,
            template_count: 90,
            walk_limit: 20,
            run_limit: 10,
            branch_limit: 200,
            sketch_points: 8,
            block_factor: 5,
            uncross_rounds: 64,
        }
    }
}
