use clap::{CommandFactory, Parser};
use colored::*;
use env_logger::{Builder, Env, Target};
use log::info;
use regex::Regex;
use std::fs;
use std::sync::Arc;
use std::time::Instant;

use lgrep::cli::Cli;
use lgrep::config::Config;
use lgrep::error::{LgrepError, Result};
use lgrep::filter::FilterCriteria;
use lgrep::pipeline::{self, CancelToken};
use lgrep::query::{RecordMode, SearchQuery};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}", e.to_string().red());
        if matches!(e, LgrepError::Config(_) | LgrepError::Regex(_)) {
            eprintln!();
            let _ = Cli::command().print_help();
            std::process::exit(2);
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    setup_logging(cli)?;
    cli.validate()?;

    let start_time = Instant::now();
    info!("Searching for {:?} under {}", cli.pattern, cli.path.display());

    let pattern = Regex::new(&cli.pattern)?;
    let mode = if cli.json {
        RecordMode::Structured
    } else {
        RecordMode::Plain
    };
    let filter = FilterCriteria {
        practice_id: cli.practice_id,
        request_id: cli.request_id.clone(),
    };
    let query = Arc::new(SearchQuery::new(
        pattern,
        cli.path.clone(),
        mode,
        filter,
    ));

    let mut config = Config::load()?;
    if cli.threads.is_some() {
        config.pipeline.workers = cli.threads;
    }

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel())
            .map_err(|e| LgrepError::Other(e.to_string()))?;
    }

    let rows = pipeline::run(query, &config.pipeline, cancel)?;

    if rows.is_empty() {
        eprintln!("{}", "No matches found".yellow());
    } else {
        for row in &rows {
            println!("{}", row.render()?);
        }
    }

    info!(
        "Finished: {} rows in {:.2?}",
        rows.len(),
        start_time.elapsed()
    );
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let default_level = if cli.verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });

    if let Some(log_path) = &cli.log {
        if let Some(parent_dir) = log_path.parent() {
            if !parent_dir.exists() {
                fs::create_dir_all(parent_dir)?;
            }
        }
        let log_file = fs::File::create(log_path)?;
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder
        .try_init()
        .map_err(|e| LgrepError::Other(e.to_string()))?;
    Ok(())
}
