//! Completion tracking across the two unit kinds sharing one counter.
//!
//! A *file unit* is added per discovered regular file and retired once that
//! file has been fully decoded into rows. A *row unit* is added per emitted
//! row, strictly before the row is handed downstream, and retired once the
//! row is discarded or merged. Because row units are always added before
//! their file's unit is retired, the counter cannot touch zero while any row
//! a live file could still produce is pending.

use std::sync::{Condvar, Mutex};

#[derive(Debug, Default)]
pub struct PendingUnits {
    count: Mutex<usize>,
    zero: Condvar,
}

impl PendingUnits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, n: usize) {
        let mut count = self.count.lock().unwrap();
        *count += n;
    }

    /// Retires one unit. Panics if the counter would go negative, which
    /// indicates a double retire.
    pub fn done(&self) {
        let mut count = self.count.lock().unwrap();
        assert!(*count > 0, "retired more units than were added");
        *count -= 1;
        if *count == 0 {
            self.zero.notify_all();
        }
    }

    /// Blocks until every added unit has been retired.
    pub fn wait(&self) {
        let mut count = self.count.lock().unwrap();
        while *count > 0 {
            count = self.zero.wait(count).unwrap();
        }
    }

    #[cfg(test)]
    pub fn outstanding(&self) -> usize {
        *self.count.lock().unwrap()
    }
}
