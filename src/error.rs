//! Error types for strand conversion

use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ComplementError>;

/// Errors raised while partitioning, scheduling or complementing a strand
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComplementError {
    /// A byte outside `A`, `T`, `C`, `G` was found
    #[error("Invalid symbol {symbol:?}{}", at_position(.position))]
    InvalidSymbol {
        /// The offending character. Workers only see bytes and report the
        /// raw byte, contenders decode it back from their input
        symbol: char,
        /// Absolute position in the strand, when known
        position: Option<usize>,
    },

    /// No strand was supplied to `convert`
    #[error("No input strand supplied")]
    MissingInput,

    /// A configuration value cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A buffer does not match the length it was partitioned for
    #[error("Buffer length mismatch: partitioned for {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The worker pool could not be built
    #[error("Cannot build worker pool: {0}")]
    ThreadPool(String),
}

fn at_position(position: &Option<usize>) -> String {
    match position {
        Some(p) => format!(" at position {p}"),
        None => String::new(),
    }
}

impl ComplementError {
    /// Attaches an absolute strand position to an `InvalidSymbol` error.
    /// Other variants are returned unchanged.
    pub fn at(self, position: usize) -> Self {
        match self {
            ComplementError::InvalidSymbol { symbol, .. } => ComplementError::InvalidSymbol {
                symbol,
                position: Some(position),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_symbol_message() {
        let err = ComplementError::InvalidSymbol {
            symbol: 'X',
            position: None,
        };
        assert_eq!(err.to_string(), "Invalid symbol 'X'");
        assert_eq!(err.at(3).to_string(), "Invalid symbol 'X' at position 3");
    }

    #[test]
    fn test_at_keeps_other_variants() {
        assert_eq!(ComplementError::MissingInput.at(7), ComplementError::MissingInput);
    }
}
