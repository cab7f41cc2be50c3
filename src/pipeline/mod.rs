//! The concurrent scan-filter-merge pipeline.
//!
//! Paths flow from the walker through a bounded file channel into a pool of
//! file workers, which decode them into rows. Rows flow through a bounded
//! row channel into a pool of row workers, which filter and pattern-match
//! them. Survivors flow through a bounded sort channel into a single merger,
//! which orders them on a min-heap. A shared pending-unit counter tracks
//! every in-flight file and row, so the coordinator knows exactly when all
//! fan-out has resolved.

mod pending;
mod worker;

pub use pending::PendingUnits;

use crossbeam_channel::bounded;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::PipelineConfig;
use crate::error::{LgrepError, Result};
use crate::query::SearchQuery;
use crate::record::Row;
use crate::walker::walk_files;

use worker::{FileWorker, Merger, RowWorker};

/// Shared abort flag. Workers observe it at the top of each receive
/// iteration and the producer before each enqueue; once set, in-flight rows
/// are retired and discarded instead of delivered, so the counter still
/// drains and every thread unwinds without deadlock.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs one complete scan and returns the matched rows in ascending
/// sort-key order.
pub fn run(
    query: Arc<SearchQuery>,
    settings: &PipelineConfig,
    cancel: CancelToken,
) -> Result<Vec<Row>> {
    let workers = settings.effective_workers();
    let capacity = settings.channel_capacity.max(1);
    info!(
        "Scanning {} with {workers} workers per pool (channel capacity {capacity})",
        query.root.display()
    );

    let (file_tx, file_rx) = bounded::<PathBuf>(capacity);
    let (row_tx, row_rx) = bounded::<Row>(capacity);
    let (sort_tx, sort_rx) = bounded::<Row>(capacity);
    let pending = Arc::new(PendingUnits::new());

    let merger = Merger {
        sort: sort_rx,
        pending: Arc::clone(&pending),
    };
    let merger_handle = thread::spawn(move || merger.run());

    let row_handles: Vec<_> = (0..workers)
        .map(|_| {
            let worker = RowWorker {
                query: Arc::clone(&query),
                rows: row_rx.clone(),
                sort: sort_tx.clone(),
                pending: Arc::clone(&pending),
                cancel: cancel.clone(),
            };
            thread::spawn(move || worker.run())
        })
        .collect();

    let file_handles: Vec<_> = (0..workers)
        .map(|_| {
            let worker = FileWorker {
                query: Arc::clone(&query),
                files: file_rx.clone(),
                rows: row_tx.clone(),
                pending: Arc::clone(&pending),
                cancel: cancel.clone(),
            };
            thread::spawn(move || worker.run())
        })
        .collect();

    // only the clones held by the pools keep the downstream channels open
    drop(file_rx);
    drop(row_tx);
    drop(row_rx);
    drop(sort_tx);

    // drive the walker; a full file channel blocks here, bounding memory on
    // arbitrarily large trees
    let mut discovered = 0usize;
    for path in walk_files(&query.root) {
        if cancel.is_cancelled() {
            break;
        }
        pending.add(1);
        if file_tx.send(path).is_err() {
            pending.done();
            break;
        }
        discovered += 1;
    }
    drop(file_tx);
    debug!("Discovered {discovered} files, waiting for in-flight work");

    // blocks until every file and row unit has been retired
    pending.wait();

    for handle in file_handles {
        handle
            .join()
            .map_err(|_| LgrepError::Other("file worker panicked".into()))?;
    }
    for handle in row_handles {
        handle
            .join()
            .map_err(|_| LgrepError::Other("row worker panicked".into()))?;
    }
    let heap = merger_handle
        .join()
        .map_err(|_| LgrepError::Other("merger panicked".into()))?;

    info!("Scan complete: {} matching rows", heap.len());
    Ok(heap.into_sorted_rows())
}
