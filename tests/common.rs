use anyhow::Result;
use dna_contest::{contenders, Contender, ContestConfig, ParallelExecutor};
use std::sync::Arc;

/// Every contender, with small thresholds so that short strands still
/// fan out into many tasks
pub fn setup_contenders() -> Result<Vec<Box<dyn Contender>>> {
    let config = ContestConfig {
        threads: 4,
        chunk_multiplier: 4,
        recursion_limit: 1_000,
        fork_join_threshold: 5_000,
    };
    let executor = Arc::new(ParallelExecutor::new(config.threads)?);
    Ok(contenders(&config, executor)?)
}
