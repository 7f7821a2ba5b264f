//! Parallel executor, fans out range workers over a shared worker pool and
//! joins on them.
//!
//! The strand buffer is never locked: each task receives a disjoint
//! `&mut [u8]`, either from a [Partition] or from halving its parent's
//! slice. The only synchronisation is the join at the end of a `rayon`
//! scope (or of `rayon::join`), which covers every task spawned inside it,
//! however deep the recursion went.
use crate::config::ContestConfig;
use crate::error::{ComplementError, Result};
use crate::partition::{Partition, RecursiveHalving};
use crate::sequence::complement_in_place;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use rayon::{Scope, ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

static SHARED: OnceCell<Arc<ParallelExecutor>> = OnceCell::new();

/// Holds the first error raised by any task of one run. Later errors are
/// dropped, tasks already running are left to finish.
type Failure = OnceCell<ComplementError>;

fn record(failure: &Failure, result: Result<()>) {
    if let Err(e) = result {
        let _ = failure.set(e);
    }
}

fn into_result(failure: Failure) -> Result<()> {
    match failure.into_inner() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Schedules range workers on a fixed size pool of threads
#[derive(Debug)]
pub struct ParallelExecutor {
    pool: ThreadPool,
}

impl ParallelExecutor {
    /// Builds an executor backed by its own pool of `threads` workers
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(ComplementError::InvalidConfig(
                "worker threads must be at least 1".to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("dna-contest-worker-{i}"))
            .build()
            .map_err(|e| ComplementError::ThreadPool(e.to_string()))?;
        info!("Built worker pool with {} threads", threads);
        Ok(ParallelExecutor { pool })
    }

    /// Returns the process wide executor, building it from `config` on the
    /// first call. Later calls reuse the same pool whatever `config` says.
    pub fn shared(config: &ContestConfig) -> Result<Arc<Self>> {
        let executor = SHARED.get_or_try_init(|| Self::new(config.threads).map(Arc::new))?;
        if executor.threads() != config.threads {
            warn!(
                "Shared pool already running {} threads, ignoring request for {}",
                executor.threads(),
                config.threads
            );
        }
        Ok(Arc::clone(executor))
    }

    /// Number of worker threads in the pool
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs one task per range of `partition` and waits for all of them.
    pub fn run_partition(&self, partition: &Partition, buf: &mut [u8]) -> Result<()> {
        let chunks = partition.split_mut(buf)?;
        debug!("Dispatching {} fixed tasks", chunks.len());
        let failure = Failure::new();
        self.pool.scope(|s| {
            for (offset, chunk) in chunks {
                let failure = &failure;
                s.spawn(move |_| record(failure, complement_in_place(chunk, offset)));
            }
        });
        into_result(failure)
    }

    /// Spawns one request for the whole buffer; each request either
    /// spawns a leaf task or two child requests in the same scope. Returns
    /// once the whole tree has completed.
    pub fn run_recursive(&self, halving: RecursiveHalving, buf: &mut [u8]) -> Result<()> {
        debug!(
            "Dispatching recursive request over {} symbols, limit {}",
            buf.len(),
            halving.limit()
        );
        let failure = Failure::new();
        self.pool.scope(|s| {
            let failure = &failure;
            s.spawn(move |s| spawn_halves(s, halving, buf, 0, failure));
        });
        into_result(failure)
    }

    /// Halves the buffer with `rayon::join` until the pieces are leaves.
    /// Both halves are complete before the parent returns.
    pub fn run_fork_join(&self, halving: RecursiveHalving, buf: &mut [u8]) -> Result<()> {
        debug!(
            "Fork-join over {} symbols, threshold {}",
            buf.len(),
            halving.limit()
        );
        self.pool.install(|| join_halves(halving, buf, 0))
    }
}

fn spawn_halves<'scope>(
    scope: &Scope<'scope>,
    halving: RecursiveHalving,
    chunk: &'scope mut [u8],
    offset: usize,
    failure: &'scope Failure,
) {
    match halving.split_len(chunk.len()) {
        None => scope.spawn(move |_| record(failure, complement_in_place(chunk, offset))),
        Some(split) => {
            let (left, right) = chunk.split_at_mut(split);
            scope.spawn(move |s| spawn_halves(s, halving, left, offset, failure));
            scope.spawn(move |s| spawn_halves(s, halving, right, offset + split, failure));
        }
    }
}

fn join_halves(halving: RecursiveHalving, chunk: &mut [u8], offset: usize) -> Result<()> {
    match halving.split_len(chunk.len()) {
        None => complement_in_place(chunk, offset),
        Some(split) => {
            let (left, right) = chunk.split_at_mut(split);
            let (l, r) = rayon::join(
                || join_halves(halving, left, offset),
                || join_halves(halving, right, offset + split),
            );
            l.and(r)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::FixedChunks;

    fn executor() -> ParallelExecutor {
        ParallelExecutor::new(4).unwrap()
    }

    #[test]
    fn test_zero_threads() {
        assert!(matches!(
            ParallelExecutor::new(0),
            Err(ComplementError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_threads() {
        assert_eq!(executor().threads(), 4);
    }

    #[test]
    fn test_run_partition() {
        let mut buf = b"ACGTACGTAC".to_vec();
        let partition = FixedChunks::new(4).unwrap().partition(buf.len());
        executor().run_partition(&partition, &mut buf).unwrap();
        assert_eq!(buf, b"TGCATGCATG");
    }

    #[test]
    fn test_run_partition_invalid() {
        let mut buf = b"ACGTACGTAX".to_vec();
        let partition = FixedChunks::new(4).unwrap().partition(buf.len());
        let err = executor().run_partition(&partition, &mut buf).unwrap_err();
        assert_eq!(
            err,
            ComplementError::InvalidSymbol {
                symbol: 'X',
                position: Some(9)
            }
        );
    }

    #[test]
    fn test_run_partition_siblings_complete() {
        let mut buf = b"AAXAAAAAAAAA".to_vec();
        let partition = FixedChunks::new(4).unwrap().partition(buf.len());
        assert!(executor().run_partition(&partition, &mut buf).is_err());
        // only the failing chunk is left unfinished
        assert_eq!(&buf[3..], b"TTTTTTTTT");
    }

    #[test]
    fn test_run_recursive_covers_whole_tree() {
        let mut buf = vec![b'C'; 100_003];
        let halving = RecursiveHalving::new(16).unwrap();
        executor().run_recursive(halving, &mut buf).unwrap();
        assert!(buf.iter().all(|c| *c == b'G'));
    }

    #[test]
    fn test_run_recursive_invalid() {
        let mut buf = vec![b'A'; 1_000];
        buf[777] = b'N';
        let halving = RecursiveHalving::new(10).unwrap();
        let err = executor().run_recursive(halving, &mut buf).unwrap_err();
        assert_eq!(
            err,
            ComplementError::InvalidSymbol {
                symbol: 'N',
                position: Some(777)
            }
        );
    }

    #[test]
    fn test_run_fork_join() {
        let mut buf = b"ACGT".repeat(5_000);
        let halving = RecursiveHalving::new(100).unwrap();
        executor().run_fork_join(halving, &mut buf).unwrap();
        assert_eq!(buf, b"TGCA".repeat(5_000));
    }

    #[test]
    fn test_run_fork_join_reports_leftmost() {
        let mut buf = vec![b'G'; 1_000];
        buf[10] = b'x';
        buf[900] = b'y';
        let halving = RecursiveHalving::new(10).unwrap();
        let err = executor().run_fork_join(halving, &mut buf).unwrap_err();
        assert_eq!(
            err,
            ComplementError::InvalidSymbol {
                symbol: 'x',
                position: Some(10)
            }
        );
    }

    #[test]
    fn test_empty_buffer() {
        let mut buf: Vec<u8> = vec![];
        let e = executor();
        let partition = FixedChunks::new(3).unwrap().partition(0);
        e.run_partition(&partition, &mut buf).unwrap();
        let halving = RecursiveHalving::new(2).unwrap();
        e.run_recursive(halving, &mut buf).unwrap();
        e.run_fork_join(halving, &mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
