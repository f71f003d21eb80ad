use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::maze::Coord;

#[derive(Debug)]
struct Entry {
    key: usize,
    seq: u64,
    path: Vec<Coord>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        (self.key, self.seq) == (other.key, other.seq)
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and the smallest key must come out first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.key, other.seq).cmp(&(self.key, self.seq))
    }
}

/// Paths waiting to be split, longest first.
///
/// Entries are keyed by `upper_bound - length` in a min-heap; equal lengths pop
/// in insertion order.
#[derive(Debug)]
pub struct PathQueue {
    upper_bound: usize,
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl PathQueue {
    pub fn new(upper_bound: usize) -> Self {
        PathQueue {
            upper_bound,
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, path: Vec<Coord>) {
        let key = self.upper_bound.saturating_sub(path.len());
        self.heap.push(Entry {
            key,
            seq: self.next_seq,
            path,
        });
        self.next_seq += 1;
    }

    pub fn pop(&mut self) -> Option<Vec<Coord>> {
        self.heap.pop().map(|entry| entry.path)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(ys: std::ops::Range<i32>) -> Vec<Coord> {
        ys.map(|y| Coord::new(0, y)).collect()
    }

    #[test]
    fn test_longest_first() {
        let mut queue = PathQueue::new(1000);
        queue.push(path(1..5));
        queue.push(path(5..7));
        queue.push(path(7..15));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(path(7..15)));
        assert_eq!(queue.pop(), Some(path(1..5)));
        assert_eq!(queue.pop(), Some(path(5..7)));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_in_insertion_order() {
        let mut queue = PathQueue::new(10);
        queue.push(path(0..3));
        queue.push(path(10..13));
        queue.push(path(20..40));
        assert_eq!(queue.pop(), Some(path(20..40)));
        assert_eq!(queue.pop(), Some(path(0..3)));
        assert_eq!(queue.pop(), Some(path(10..13)));
    }
}
