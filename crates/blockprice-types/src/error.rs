//! Error types for blockprice.

use thiserror::Error;

/// Result type alias for blockprice operations.
pub type Result<T> = std::result::Result<T, BlockpriceError>;

/// Umbrella error for consumers that want a single type across the
/// shared vocabulary in this crate.
///
/// The worker crates each carry their own error enum; this one covers
/// the failures the types themselves can produce.
#[derive(Error, Debug)]
pub enum BlockpriceError {
    /// Exchange not recognized.
    #[error(transparent)]
    UnknownExchange(#[from] crate::ParseExchangeError),

    /// Invalid block boundary sequence.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for invalid block boundary sequences.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    /// The boundary sequence is empty.
    #[error("Boundary sequence is empty")]
    Empty,

    /// Heights must be strictly increasing.
    #[error("Block heights not strictly increasing: {prev} then {next}")]
    HeightNotIncreasing {
        /// The earlier height.
        prev: u64,
        /// The offending height.
        next: u64,
    },

    /// Timestamps must be non-decreasing.
    #[error("Block timestamp went backwards at height {height}: {prev} then {next}")]
    TimestampRegression {
        /// The height whose timestamp regressed.
        height: u64,
        /// The earlier timestamp.
        prev: f64,
        /// The offending timestamp.
        next: f64,
    },
}
