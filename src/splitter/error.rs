use thiserror::Error;

/// Configuration errors raised before any chunk is produced
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("min chunk size {min} exceeds max chunk size {max}")]
    MinExceedsMax { min: usize, max: usize },

    #[error("chunk size bounds must be positive")]
    NonPositiveBound,

    #[error("overlap {overlap} must be smaller than max chunk size {max}")]
    OverlapTooLarge { overlap: usize, max: usize },

    #[error("invalid separator pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("unknown chunking strategy: {0}")]
    UnknownStrategy(String),
}
