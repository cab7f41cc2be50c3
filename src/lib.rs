pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod heap;
pub mod pipeline;
pub mod query;
pub mod reader;
pub mod record;
pub mod walker;

pub use clap::Parser;
pub use cli::Cli;
pub use config::{Config, PipelineConfig};
pub use error::{LgrepError, Result};
pub use filter::FilterCriteria;
pub use pipeline::CancelToken;
pub use query::{RecordMode, SearchQuery};
pub use record::Row;
