use crate::filter::FilterCriteria;
use regex::Regex;
use std::path::PathBuf;

/// How the contents of each file are decoded into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordMode {
    /// One row per newline-delimited line.
    #[default]
    Plain,
    /// One row per top-level JSON object, read incrementally.
    Structured,
}

/// An immutable search request. Built once in `main`, shared read-only by
/// every worker for the lifetime of the pipeline run.
#[derive(Debug)]
pub struct SearchQuery {
    pub pattern: Regex,
    pub root: PathBuf,
    pub mode: RecordMode,
    pub filter: FilterCriteria,
}

impl SearchQuery {
    pub fn new(pattern: Regex, root: PathBuf, mode: RecordMode, filter: FilterCriteria) -> Self {
        Self {
            pattern,
            root,
            mode,
            filter,
        }
    }
}
