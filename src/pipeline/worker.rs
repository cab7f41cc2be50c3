//! The three worker stages of the scan-filter-merge pipeline.
//!
//! Each worker holds explicit handles to exactly the channels and shared
//! state it needs, passed at construction. Rows move by value from stage to
//! stage; ownership of a row's pending unit moves with it.

use crossbeam_channel::{Receiver, Sender};
use log::warn;
use serde_json::{Map, Value};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LgrepError, Result};
use crate::filter;
use crate::heap::ResultHeap;
use crate::query::{RecordMode, SearchQuery};
use crate::reader;
use crate::record::Row;

use super::pending::PendingUnits;
use super::CancelToken;

/// Decodes files into rows. A per-file error abandons the rest of that file
/// only; the file's unit is retired either way.
pub struct FileWorker {
    pub query: Arc<SearchQuery>,
    pub files: Receiver<PathBuf>,
    pub rows: Sender<Row>,
    pub pending: Arc<PendingUnits>,
    pub cancel: CancelToken,
}

impl FileWorker {
    pub fn run(self) {
        for path in self.files.iter() {
            if !self.cancel.is_cancelled() {
                if let Err(e) = self.scan_file(&path) {
                    warn!(
                        "{}",
                        LgrepError::FileProcessing {
                            path: path.clone(),
                            source: Box::new(e),
                        }
                    );
                }
            }
            // file unit: retired only after every row the file produced has
            // had its own unit added
            self.pending.done();
        }
    }

    fn scan_file(&self, path: &Path) -> Result<()> {
        let reader = reader::open(path)?;
        match self.query.mode {
            RecordMode::Plain => self.emit_lines(path, reader),
            RecordMode::Structured => self.emit_records(path, reader),
        }
    }

    fn emit_lines(&self, path: &Path, reader: Box<dyn BufRead + Send>) -> Result<()> {
        for line in reader.lines() {
            if self.cancel.is_cancelled() {
                break;
            }
            let text = line?;
            self.forward(Row::PlainLine {
                text,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn emit_records(&self, path: &Path, reader: Box<dyn BufRead + Send>) -> Result<()> {
        let stream =
            serde_json::Deserializer::from_reader(reader).into_iter::<Map<String, Value>>();
        for record in stream {
            if self.cancel.is_cancelled() {
                break;
            }
            let fields = record?;
            self.forward(Row::StructuredRecord {
                fields,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Adds the row's pending unit strictly before the send, so the counter
    /// can never hit zero with this row still in flight.
    fn forward(&self, row: Row) {
        self.pending.add(1);
        if self.rows.send(row).is_err() {
            // channel closed during shutdown; the row is discarded
            self.pending.done();
        }
    }
}

/// Applies the field filter and the pattern. Non-matches retire their unit
/// here; matches are forwarded with the unit left outstanding for the merger.
pub struct RowWorker {
    pub query: Arc<SearchQuery>,
    pub rows: Receiver<Row>,
    pub sort: Sender<Row>,
    pub pending: Arc<PendingUnits>,
    pub cancel: CancelToken,
}

impl RowWorker {
    pub fn run(self) {
        for row in self.rows.iter() {
            if self.cancel.is_cancelled() {
                self.pending.done();
                continue;
            }
            self.process(row);
        }
    }

    fn process(&self, row: Row) {
        if let Row::StructuredRecord { fields, .. } = &row {
            if !filter::matches(fields, &self.query.filter) {
                self.pending.done();
                return;
            }
        }

        let text = match row.matchable_text() {
            Ok(text) => text,
            Err(e) => {
                warn!("Dropping unserializable row from {}: {e}", row.origin().display());
                self.pending.done();
                return;
            }
        };

        if !self.query.pattern.is_match(&text) {
            self.pending.done();
            return;
        }

        if self.sort.send(row).is_err() {
            self.pending.done();
        }
    }
}

/// Single consumer feeding the heap. Must not be parallelized: exclusive
/// ownership is what lets the heap go unlocked.
pub struct Merger {
    pub sort: Receiver<Row>,
    pub pending: Arc<PendingUnits>,
}

impl Merger {
    pub fn run(self) -> ResultHeap {
        let mut heap = ResultHeap::new();
        for row in self.sort.iter() {
            match row.sort_key() {
                Some(key) => heap.push(key, row),
                None => warn!(
                    "Dropping matched record without a sortable timestamp from {}",
                    row.origin().display()
                ),
            }
            self.pending.done();
        }
        heap
    }
}
