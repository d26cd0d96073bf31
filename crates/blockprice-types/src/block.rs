//! Block boundary and per-block price record types.

use serde::{Deserialize, Serialize};

use crate::error::BoundaryError;

/// A block height paired with the timestamp of that block.
///
/// One boundary per line of the timestamp file; the window of block `H`
/// spans from the boundary timestamp of `H - 1` (exclusive start of data,
/// inclusive for membership) to the boundary timestamp of `H`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockBoundary {
    /// Block height.
    pub height: u64,
    /// Block timestamp in seconds since the Unix epoch.
    pub timestamp: f64,
}

impl BlockBoundary {
    /// Creates a new block boundary.
    #[must_use]
    pub const fn new(height: u64, timestamp: f64) -> Self {
        Self { height, timestamp }
    }
}

/// Validates a boundary sequence for use as aggregation windows.
///
/// The sequence must be non-empty, strictly increasing in height, and
/// non-decreasing in timestamp (consecutive blocks can carry equal
/// timestamps, the chain does not enforce strict clock order).
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_boundaries(boundaries: &[BlockBoundary]) -> Result<(), BoundaryError> {
    let Some(first) = boundaries.first() else {
        return Err(BoundaryError::Empty);
    };

    let mut prev = *first;
    for next in &boundaries[1..] {
        if next.height <= prev.height {
            return Err(BoundaryError::HeightNotIncreasing {
                prev: prev.height,
                next: next.height,
            });
        }
        if next.timestamp < prev.timestamp {
            return Err(BoundaryError::TimestampRegression {
                height: next.height,
                prev: prev.timestamp,
                next: next.timestamp,
            });
        }
        prev = *next;
    }
    Ok(())
}

/// A published per-block OHLCV record.
///
/// Field names match the exported CSV/JSON column names exactly. Times are
/// seconds since the Unix epoch; the window covers `(opentime, closetime]`
/// by construction with both bounds admitting ticks during aggregation (a
/// tick landing exactly on a shared boundary belongs to the earlier block).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockPrice {
    /// Block height this record prices.
    pub block_height: u64,
    /// Window start: the previous block's timestamp.
    pub opentime: f64,
    /// Window end: this block's timestamp.
    pub closetime: f64,
    /// First traded price in the window, or the carried-forward close.
    pub open: f64,
    /// Highest traded price in the window.
    pub high: f64,
    /// Lowest traded price in the window.
    pub low: f64,
    /// Last traded price in the window, or the carried-forward close.
    pub close: f64,
    /// Total BTC volume traded in the window across all sources.
    pub volume: f64,
}

impl BlockPrice {
    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns true if the open never moved off the zero seed, i.e. no
    /// trade and no carried price ever reached this window.
    #[must_use]
    pub fn is_zero_open(&self) -> bool {
        self.open == 0.0
    }
}
