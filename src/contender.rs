//! Module for the contenders, the strategies competing to complement a
//! strand as fast as possible.
//!
//! All of them copy the input into one buffer, complement it in place from
//! the shared worker pool and hand the buffer back as a `String`. They only
//! differ in how the buffer is cut into tasks.
use crate::config::ContestConfig;
use crate::error::{ComplementError, Result};
use crate::executor::ParallelExecutor;
use crate::partition::{FixedChunks, RecursiveHalving};
use crate::strand::{decode_symbol, into_strand};
use std::sync::Arc;

/// A strategy taking part in the contest
pub trait Contender: Send + Sync {
    /// Name used when reporting and ranking
    fn describe(&self) -> String;
    /// Returns the complement of `input`. `None` stands for a missing
    /// strand and fails with `MissingInput` before any work is done.
    fn convert(&self, input: Option<&str>) -> Result<String>;
}

/// Copies the input into a buffer, runs `complement` over it and hands the
/// buffer back as a `String`
fn convert_with<F>(input: Option<&str>, complement: F) -> Result<String>
where
    F: FnOnce(&mut [u8]) -> Result<()>,
{
    let input = input.ok_or(ComplementError::MissingInput)?;
    let mut strand = input.as_bytes().to_vec();
    complement(&mut strand).map_err(|e| decode_symbol(input, e))?;
    Ok(into_strand(strand))
}

/// Splits the strand into a fixed number of chunks, a multiple of the
/// worker threads, and runs one task per chunk.
#[derive(Debug)]
pub struct FixedChunkContender {
    chunking: FixedChunks,
    executor: Arc<ParallelExecutor>,
}

impl FixedChunkContender {
    pub fn new(executor: Arc<ParallelExecutor>, chunks: usize) -> Result<Self> {
        Ok(FixedChunkContender {
            chunking: FixedChunks::new(chunks)?,
            executor,
        })
    }

    /// Uses `chunk_multiplier` chunks per thread of `executor`
    pub fn from_config(config: &ContestConfig, executor: Arc<ParallelExecutor>) -> Result<Self> {
        let chunks = config.chunks_for(executor.threads())?;
        Self::new(executor, chunks)
    }

    pub fn chunks(&self) -> usize {
        self.chunking.chunks()
    }
}

impl Contender for FixedChunkContender {
    fn describe(&self) -> String {
        format!("Fixed chunks, {} tasks on a shared buffer", self.chunks())
    }

    fn convert(&self, input: Option<&str>) -> Result<String> {
        convert_with(input, |strand| {
            let partition = self.chunking.partition(strand.len());
            self.executor.run_partition(&partition, strand)
        })
    }
}

/// Halves the strand recursively, every request spawning either a leaf
/// task or two new requests in the same scope.
#[derive(Debug)]
pub struct RecursiveContender {
    halving: RecursiveHalving,
    executor: Arc<ParallelExecutor>,
}

impl RecursiveContender {
    pub fn new(executor: Arc<ParallelExecutor>, limit: usize) -> Result<Self> {
        Ok(RecursiveContender {
            halving: RecursiveHalving::new(limit)?,
            executor,
        })
    }

    pub fn from_config(config: &ContestConfig, executor: Arc<ParallelExecutor>) -> Result<Self> {
        Self::new(executor, config.recursion_limit)
    }
}

impl Contender for RecursiveContender {
    fn describe(&self) -> String {
        format!(
            "Recursive spawn, halving down to {} symbols",
            self.halving.limit()
        )
    }

    fn convert(&self, input: Option<&str>) -> Result<String> {
        convert_with(input, |strand| self.executor.run_recursive(self.halving, strand))
    }
}

/// Divide and conquer with `rayon::join`, writing directly into the buffer
#[derive(Debug)]
pub struct ForkJoinContender {
    halving: RecursiveHalving,
    executor: Arc<ParallelExecutor>,
}

impl ForkJoinContender {
    pub fn new(executor: Arc<ParallelExecutor>, threshold: usize) -> Result<Self> {
        Ok(ForkJoinContender {
            halving: RecursiveHalving::new(threshold)?,
            executor,
        })
    }

    pub fn from_config(config: &ContestConfig, executor: Arc<ParallelExecutor>) -> Result<Self> {
        Self::new(executor, config.fork_join_threshold)
    }
}

impl Contender for ForkJoinContender {
    fn describe(&self) -> String {
        format!(
            "Fork-join, direct write below {} symbols",
            self.halving.limit()
        )
    }

    fn convert(&self, input: Option<&str>) -> Result<String> {
        convert_with(input, |strand| self.executor.run_fork_join(self.halving, strand))
    }
}

/// All the contenders, sharing `executor`
pub fn contenders(
    config: &ContestConfig,
    executor: Arc<ParallelExecutor>,
) -> Result<Vec<Box<dyn Contender>>> {
    config.validate()?;
    let contenders: Vec<Box<dyn Contender>> = vec![
        Box::new(FixedChunkContender::from_config(config, Arc::clone(&executor))?),
        Box::new(RecursiveContender::from_config(config, Arc::clone(&executor))?),
        Box::new(ForkJoinContender::from_config(config, executor)?),
    ];
    Ok(contenders)
}
