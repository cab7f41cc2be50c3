use clap::Parser;
use std::path::PathBuf;

use crate::error::{LgrepError, Result};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Pattern to search for (regular expression)
    pub pattern: String,

    /// File or directory to search in
    #[clap(default_value = ".")]
    pub path: PathBuf,

    /// Parse files as newline-delimited JSON records
    #[clap(long, default_value_t = false)]
    pub json: bool,

    /// Only return records whose message.practice_id equals this value
    #[clap(long, value_parser)]
    pub practice_id: Option<i64>,

    /// Only return records whose message.request_id equals this value
    #[clap(long, value_parser)]
    pub request_id: Option<String>,

    /// Worker threads per pool (defaults to available parallelism)
    #[clap(long, value_parser)]
    pub threads: Option<usize>,

    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,
}

impl Cli {
    /// Rejects invalid flag combinations before any scanning starts.
    pub fn validate(&self) -> Result<()> {
        if self.pattern.is_empty() {
            return Err(LgrepError::Config(
                "Please enter a non-empty string for the pattern argument.".into(),
            ));
        }
        if !self.json && (self.practice_id.is_some() || self.request_id.is_some()) {
            return Err(LgrepError::Config(
                "To filter on fields, use the --json flag.".into(),
            ));
        }
        Ok(())
    }
}
