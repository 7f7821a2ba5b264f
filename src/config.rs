//! Configuration of the worker pool and of the contenders.
//!
//! Values are resolved once, usually through [ContestConfig::from_env], and
//! then handed to the contenders when they are built.
use crate::error::ComplementError;
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::env::{var, VarError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::thread::available_parallelism;

/// Path of a JSON file with a [ContestConfig]
pub const CONFIG_VAR: &str = "DNA_CONTEST_CONFIG";
/// Overrides [ContestConfig::threads]
pub const THREADS_VAR: &str = "DNA_CONTEST_THREADS";
/// Overrides [ContestConfig::chunk_multiplier]
pub const CHUNK_MULTIPLIER_VAR: &str = "DNA_CONTEST_CHUNK_MULTIPLIER";
/// Overrides [ContestConfig::recursion_limit]
pub const RECURSION_LIMIT_VAR: &str = "DNA_CONTEST_RECURSION_LIMIT";
/// Overrides [ContestConfig::fork_join_threshold]
pub const FORK_JOIN_THRESHOLD_VAR: &str = "DNA_CONTEST_FORK_JOIN_THRESHOLD";

/// Upper bound on the chunks of the fixed-chunk contender
pub const MAX_CHUNKS: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestConfig {
    /// Worker threads in the pool, defaults to the available parallelism
    pub threads: usize,
    /// Chunks per worker thread for the fixed-chunk contender
    pub chunk_multiplier: usize,
    /// Ranges shorter than this are leaves for the recursive contender
    pub recursion_limit: usize,
    /// Ranges shorter than this are leaves for the fork-join contender
    pub fork_join_threshold: usize,
}

impl Default for ContestConfig {
    fn default() -> Self {
        ContestConfig {
            threads: available_parallelism().map(|n| n.get()).unwrap_or(1),
            chunk_multiplier: 4,
            recursion_limit: 10_000,
            fork_join_threshold: 100_000,
        }
    }
}

impl ContestConfig {
    /// Number of chunks used by the fixed-chunk contender
    pub fn chunk_count(&self) -> std::result::Result<usize, ComplementError> {
        self.chunks_for(self.threads)
    }

    /// Number of chunks for a pool of `threads` workers, at most
    /// `MAX_CHUNKS`
    pub fn chunks_for(&self, threads: usize) -> std::result::Result<usize, ComplementError> {
        match threads.checked_mul(self.chunk_multiplier) {
            Some(chunks) if chunks <= MAX_CHUNKS => Ok(chunks),
            _ => Err(ComplementError::InvalidConfig(format!(
                "{} threads x {} chunks per thread exceeds {} chunks",
                threads, self.chunk_multiplier, MAX_CHUNKS
            ))),
        }
    }

    /// Checks that every value can be used to build the contenders
    pub fn validate(&self) -> std::result::Result<(), ComplementError> {
        if self.threads == 0 {
            return Err(ComplementError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.chunk_multiplier == 0 {
            return Err(ComplementError::InvalidConfig(
                "chunk_multiplier must be at least 1".to_string(),
            ));
        }
        self.chunk_count()?;
        if self.recursion_limit < 2 || self.fork_join_threshold < 2 {
            return Err(ComplementError::InvalidConfig(format!(
                "recursion_limit ({}) and fork_join_threshold ({}) must be at least 2",
                self.recursion_limit, self.fork_join_threshold
            )));
        }
        Ok(())
    }

    /// Reads a JSON configuration, missing fields take their default
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: ContestConfig =
            serde_json::from_reader(reader).context("Cannot parse the configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(file_name: P) -> Result<Self> {
        let file_name = file_name.as_ref();
        info!("Reading configuration from {}", file_name.display());
        let file_handle = File::open(file_name)
            .map(BufReader::new)
            .with_context(|| format!("Cannot open configuration file {}", file_name.display()))?;
        Self::from_reader(file_handle)
    }

    /// Starts from the file in `DNA_CONTEST_CONFIG` if set, or from the
    /// defaults, then applies the per-field environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match env_value(CONFIG_VAR)? {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        let overrides: [(&str, &mut usize); 4] = [
            (THREADS_VAR, &mut config.threads),
            (CHUNK_MULTIPLIER_VAR, &mut config.chunk_multiplier),
            (RECURSION_LIMIT_VAR, &mut config.recursion_limit),
            (FORK_JOIN_THRESHOLD_VAR, &mut config.fork_join_threshold),
        ];
        for (name, field) in overrides {
            if let Some(value) = env_value(name)? {
                *field = parse_override(name, &value)?;
            }
        }
        config.validate()?;
        Ok(config)
    }
}

fn env_value(name: &str) -> Result<Option<String>> {
    match var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Cannot read {name}")),
    }
}

/// Parses the value of an override variable
pub fn parse_override(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{name} must be a positive integer, got {value:?}"))
}
