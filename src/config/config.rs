use crate::error::TrimError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "PAIRTRIM_CONFIG";

/// Tuning knobs read from `config.toml`. Every field has a default, so a
/// partial or missing file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_source_queue_factor")]
    pub source_queue_factor: usize,
    #[serde(default = "default_task_queue_factor")]
    pub task_queue_factor: usize,
    #[serde(default = "default_consumer_queue_factor")]
    pub consumer_queue_factor: usize,
    #[serde(default = "default_pool_shutdown_timeout_secs")]
    pub pool_shutdown_timeout_secs: u64,
    #[serde(default = "default_read_buffer_bytes")]
    pub read_buffer_bytes: usize,
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

fn default_batch_size() -> usize {
    1000
}

fn default_source_queue_factor() -> usize {
    1
}

fn default_task_queue_factor() -> usize {
    2
}

fn default_consumer_queue_factor() -> usize {
    5
}

fn default_pool_shutdown_timeout_secs() -> u64 {
    3600
}

fn default_read_buffer_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_compression_level() -> u32 {
    6
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            source_queue_factor: default_source_queue_factor(),
            task_queue_factor: default_task_queue_factor(),
            consumer_queue_factor: default_consumer_queue_factor(),
            pool_shutdown_timeout_secs: default_pool_shutdown_timeout_secs(),
            read_buffer_bytes: default_read_buffer_bytes(),
            compression_level: default_compression_level(),
        }
    }
}

impl Config {
    /// Load from `$PAIRTRIM_CONFIG` or the per-user config directory,
    /// falling back to defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring configuration {}: {:#}", path.display(), e);
                Config::default()
            }),
            _ => Config::default(),
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)
            .with_context(|| format!("Failed to write {}", config_path.display()))
    }

    fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("org", "pairtrim", "pairtrim")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Reject values that cannot be honoured.
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(TrimError::InvalidOption(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            ))
            .into());
        }
        Ok(())
    }

    pub fn pipeline_settings(&self, threads: usize) -> PipelineSettings {
        let threads = threads.max(1);
        PipelineSettings {
            threads,
            batch_size: self.batch_size.max(1),
            source_queue_capacity: (self.source_queue_factor * threads).max(1),
            task_queue_capacity: (self.task_queue_factor * threads).max(1),
            consumer_queue_capacity: (self.consumer_queue_factor * threads).max(1),
            pool_shutdown_timeout: Duration::from_secs(self.pool_shutdown_timeout_secs),
        }
    }
}

/// Runtime sizing of the trimming pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// 1 selects the single-threaded mode; otherwise the trim pool size.
    pub threads: usize,
    pub batch_size: usize,
    pub source_queue_capacity: usize,
    pub task_queue_capacity: usize,
    pub consumer_queue_capacity: usize,
    pub pool_shutdown_timeout: Duration,
}

impl PipelineSettings {
    pub fn new(threads: usize) -> Self {
        Config::default().pipeline_settings(threads)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}
