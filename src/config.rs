use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LgrepError, Result};

/// Optional on-disk tuning knobs. Missing file means defaults; CLI flags
/// override whatever is loaded here.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Worker threads per pool. `None` uses the available parallelism.
    pub workers: Option<usize>,
    /// Capacity of each bounded channel (the backpressure bound).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    100
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl PipelineConfig {
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| num_cpus::get()).max(1)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            LgrepError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("lgrep/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".lgrep.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".lgrep.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }
}
