//! Min-heap of matched rows keyed by sort key.
//!
//! Accessed from a single thread only (the merger during the run, the
//! coordinator during the drain), so no locking. The relative order of
//! entries with equal keys is unspecified: it follows heap insertion order,
//! which depends on thread scheduling.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::record::Row;

#[derive(Debug)]
pub struct HeapEntry {
    pub key: String,
    pub row: Row,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Binary min-heap over `HeapEntry`, smallest sort key first.
#[derive(Debug, Default)]
pub struct ResultHeap {
    entries: BinaryHeap<Reverse<HeapEntry>>,
}

impl ResultHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: String, row: Row) {
        self.entries.push(Reverse(HeapEntry { key, row }));
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop(&mut self) -> Option<HeapEntry> {
        self.entries.pop().map(|Reverse(entry)| entry)
    }

    pub fn peek(&self) -> Option<&HeapEntry> {
        self.entries.peek().map(|Reverse(entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains the heap into ascending sort-key order.
    pub fn into_sorted_rows(mut self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.len());
        while let Some(entry) = self.pop() {
            rows.push(entry.row);
        }
        rows
    }
}
