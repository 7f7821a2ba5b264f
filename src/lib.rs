//! Crate to benchmark parallel strategies for complementing DNA strands
pub mod config;
pub mod contender;
pub mod error;
pub mod executor;
pub mod partition;
pub mod sequence;
pub mod strand;

pub use config::ContestConfig;
pub use contender::{contenders, Contender};
pub use error::{ComplementError, Result};
pub use executor::ParallelExecutor;
