use rand::seq::SliceRandom;

use crate::error::{MazeError, MazeResult};
use crate::generators::Throttle;
use crate::maze::{CellId, Direction, Maze};

/// Disjoint sets over the surface cells, merged by moving member lists.
///
/// Under cells never belong to a set; a tunnel joins the sets on either side of it instead.
#[derive(Debug, Clone)]
pub struct DisjointSets {
    set_of: Vec<usize>,
    members: Vec<Vec<CellId>>,
    count: usize,
}

impl DisjointSets {
    /// One singleton set per cell id in `0..len`.
    pub fn new(len: usize) -> Self {
        DisjointSets {
            set_of: (0..len).collect(),
            members: (0..len).map(|i| vec![CellId::new(i)]).collect(),
            count: len,
        }
    }

    pub fn set_of(&self, id: CellId) -> Option<usize> {
        self.set_of.get(id.index()).copied()
    }

    pub fn same_set(&self, a: CellId, b: CellId) -> bool {
        match (self.set_of(a), self.set_of(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Merges the sets of `a` and `b`. Returns false when there was nothing to merge.
    pub fn join(&mut self, a: CellId, b: CellId) -> bool {
        let (Some(mut keep), Some(mut drop)) = (self.set_of(a), self.set_of(b)) else {
            return false;
        };
        if keep == drop {
            return false;
        }
        if self.members[keep].len() < self.members[drop].len() {
            std::mem::swap(&mut keep, &mut drop);
        }
        let moved = std::mem::take(&mut self.members[drop]);
        for id in &moved {
            self.set_of[id.index()] = keep;
        }
        self.members[keep].extend(moved);
        self.count -= 1;
        true
    }

    /// Every cell sharing a set with `id`.
    pub fn members(&self, id: CellId) -> &[CellId] {
        match self.set_of(id) {
            Some(set) => &self.members[set],
            None => &[],
        }
    }

    pub fn set_count(&self) -> usize {
        self.count
    }
}

impl Maze {
    /// Starts union-find bookkeeping with every surface cell in its own set.
    pub fn init_disjoint_sets(&mut self) {
        self.sets = Some(DisjointSets::new(self.size()));
    }

    pub fn disjoint_sets(&self) -> MazeResult<&DisjointSets> {
        self.sets.as_ref().ok_or(MazeError::DisjointSetsMissing)
    }

    pub(crate) fn disjoint_sets_mut(&mut self) -> MazeResult<&mut DisjointSets> {
        self.sets.as_mut().ok_or(MazeError::DisjointSetsMissing)
    }
}

/// Whether a door between `a` and `b` keeps the union-find forest a forest
/// and respects every weave lock.
pub fn can_join(maze: &Maze, a: CellId, b: CellId) -> MazeResult<bool> {
    let (first, second) = (maze.cell(a), maze.cell(b));
    if first.has_under_cell() || second.has_under_cell() {
        return Ok(false);
    }
    if !(first.is_free_to_link() && second.is_free_to_link()) {
        return Ok(false);
    }
    Ok(!maze.disjoint_sets()?.same_set(a, b))
}

/// Carves the door from `a` toward `direction` and merges the sets on both sides.
pub fn join(maze: &mut Maze, a: CellId, direction: Direction, b: CellId) -> MazeResult<()> {
    maze.link(a, direction, b)?;
    maze.disjoint_sets_mut()?.join(a, b);
    Ok(())
}

/// The terminal global pass: every adjacent pair, in random order, gets a door
/// when [`can_join`] allows it.
///
/// Template locks can leave regions apart, so a second pass stitches any
/// remaining sets together ignoring link locks. Cells with under cells stay untouched.
pub fn join_all(maze: &mut Maze, progress: &mut Throttle) -> MazeResult<()> {
    maze.color_all(1);
    let mut pairs = maze.all_nextdoor_pairs();
    pairs.shuffle(maze.rng());
    let total = pairs.len();
    for (done, &(a, direction, b)) in pairs.iter().enumerate() {
        progress.tick(done, total);
        if can_join(maze, a, b)? {
            join(maze, a, direction, b)?;
        }
    }

    let mut stitched = 0;
    for &(a, direction, b) in &pairs {
        if maze.disjoint_sets()?.set_count() == 1 {
            break;
        }
        if maze.cell(a).has_under_cell() || maze.cell(b).has_under_cell() {
            continue;
        }
        if !maze.disjoint_sets()?.same_set(a, b) {
            join(maze, a, direction, b)?;
            stitched += 1;
        }
    }
    if stitched > 0 {
        tracing::debug!("[kruskal] stitched {stitched} locked regions together");
    }
    Ok(())
}

/// Randomized Kruskal over the whole grid.
pub fn kruskal(maze: &mut Maze, progress: &mut Throttle) -> MazeResult<()> {
    maze.init_disjoint_sets();
    join_all(maze, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::SilentProgress;
    use crate::maze::Coord;

    #[test]
    fn test_disjoint_sets_join() {
        let mut sets = DisjointSets::new(6);
        let id = CellId::new;
        assert_eq!(sets.set_count(), 6);
        assert!(sets.join(id(0), id(1)));
        assert!(sets.join(id(2), id(1)));
        assert!(sets.same_set(id(0), id(2)));
        assert!(!sets.join(id(0), id(2)));
        assert_eq!(sets.set_count(), 4);
        let mut members = sets.members(id(1)).to_vec();
        members.sort();
        assert_eq!(members, vec![id(0), id(1), id(2)]);
        assert!(!sets.same_set(id(0), id(5)));
        assert_eq!(sets.set_of(id(9)), None);
        assert!(!sets.join(id(0), id(9)));
    }

    #[test]
    fn test_join_without_sets() {
        let mut maze = Maze::with_seed(2, 2, "T", 1);
        let a = maze.id_at(Coord::new(0, 0)).unwrap();
        let b = maze.id_at(Coord::new(0, 1)).unwrap();
        assert_eq!(can_join(&maze, a, b), Err(MazeError::DisjointSetsMissing));
        let mut silent = SilentProgress;
        assert_eq!(
            join_all(&mut maze, &mut Throttle::new(&mut silent)),
            Err(MazeError::DisjointSetsMissing)
        );
    }

    #[test]
    fn test_can_join_respects_locks() {
        let mut maze = Maze::with_seed(2, 2, "T", 1);
        maze.init_disjoint_sets();
        let a = maze.id_at(Coord::new(0, 0)).unwrap();
        let b = maze.id_at(Coord::new(0, 1)).unwrap();
        let c = maze.id_at(Coord::new(1, 1)).unwrap();
        assert_eq!(can_join(&maze, a, b), Ok(true));
        join(&mut maze, a, Direction::East, b).unwrap();
        assert!(maze.cell(b).has_door(Direction::West));
        assert_eq!(can_join(&maze, a, b), Ok(false));
        maze.cell_mut(c).lock_link();
        assert_eq!(can_join(&maze, b, c), Ok(false));
    }

    #[test]
    fn test_kruskal_is_a_tree() {
        let mut silent = SilentProgress;
        for seed in 0..5 {
            let mut maze = Maze::with_seed(11, 7, "T", seed);
            kruskal(&mut maze, &mut Throttle::new(&mut silent)).unwrap();
            assert!(maze.validate().unwrap().is_perfect());
            assert_eq!(maze.disjoint_sets().unwrap().set_count(), 1);
        }
    }

    #[test]
    fn test_stitch_pass_ignores_link_locks() {
        let mut maze = Maze::with_seed(3, 3, "T", 1);
        maze.init_disjoint_sets();
        let center = maze.id_at(Coord::new(1, 1)).unwrap();
        maze.cell_mut(center).lock_link();
        let mut silent = SilentProgress;
        join_all(&mut maze, &mut Throttle::new(&mut silent)).unwrap();
        assert!(maze.validate().unwrap().is_perfect());
        assert_eq!(maze.cell(center).door_count(), 1);
    }
}
