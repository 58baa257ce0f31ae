use thiserror::Error;

/// Main error type for BER parsing and encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BerError {
    /// Malformed header, a child overrunning its parent, or bad adapter input
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The buffer ends before `length` bytes could be read at `offset`
    #[error("Out of data: need {length} byte(s) at offset {offset}")]
    OutOfData { offset: usize, length: usize },

    /// Nodes nested deeper than the configured limit given here
    #[error("Nesting depth limit exceeded: {0}")]
    DepthLimitExceeded(usize),
}

impl BerError {
    /// Shorthand for building an [`BerError::OutOfData`] error
    pub fn out_of_data(offset: usize, length: usize) -> Self {
        BerError::OutOfData { offset, length }
    }
}

/// Result type alias for BER operations
pub type BerResult<T> = Result<T, BerError>;
