use crate::maze::CellId;

/// Per-cell traversal state shared by the flood fills and searches.
///
/// Kept apart from [`Cell`](crate::maze::Cell) so the long-lived graph only holds doors and locks.
#[derive(Debug, Clone, Default)]
pub struct Scratch {
    colors: Vec<u32>,
    prev: Vec<Option<CellId>>,
    distance: Vec<usize>,
}

impl Scratch {
    pub fn with_len(len: usize) -> Self {
        Scratch {
            colors: vec![0; len],
            prev: vec![None; len],
            distance: vec![0; len],
        }
    }

    /// Makes room for one more cell.
    pub fn push(&mut self) {
        self.colors.push(0);
        self.prev.push(None);
        self.distance.push(0);
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, id: CellId) -> u32 {
        self.colors[id.index()]
    }

    pub fn set_color(&mut self, id: CellId, color: u32) {
        self.colors[id.index()] = color;
    }

    pub fn fill_color(&mut self, color: u32) {
        self.colors.fill(color);
    }

    pub fn uses_color(&self, color: u32) -> bool {
        self.colors.contains(&color)
    }

    pub fn prev(&self, id: CellId) -> Option<CellId> {
        self.prev[id.index()]
    }

    pub fn set_prev(&mut self, id: CellId, prev: Option<CellId>) {
        self.prev[id.index()] = prev;
    }

    pub fn distance(&self, id: CellId) -> usize {
        self.distance[id.index()]
    }

    pub fn set_distance(&mut self, id: CellId, distance: usize) {
        self.distance[id.index()] = distance;
    }

    /// Clears back-pointers and distances, leaving colors alone.
    pub fn reset_links(&mut self) {
        self.prev.fill(None);
        self.distance.fill(0);
    }
}
