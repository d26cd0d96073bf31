//! Multi-source aggregation over a shared block window sequence.

use blockprice_types::{BlockBoundary, BoundaryError, Exchange, Tick, validate_boundaries};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::BlockWindow;

/// Ticks stamped earlier than this (April 2010) are discarded as spurious;
/// none of the supported markets traded before it.
pub const TICK_TIMESTAMP_FLOOR: f64 = 1_270_000_000.0;

/// Aggregates per-exchange trade streams into a shared sequence of block
/// windows.
///
/// The window sequence is built once from the block boundaries: the window
/// of height `H` closes at `H`'s boundary timestamp and opens at the
/// previous boundary's (the very first window opens at 0.0). Every source
/// is then fed through its own [`SourcePass`]; passes run strictly
/// sequentially and merge into the same windows.
///
/// Process sources in ascending [`Exchange`] order. Carry-forward fills are
/// seeded by whichever pass first advances over a window, so a fixed order
/// is what makes re-aggregation reproducible.
#[derive(Debug)]
pub struct BlockAggregator {
    windows: Vec<BlockWindow>,
    final_height: u64,
}

impl BlockAggregator {
    /// Builds the window sequence from block boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundaries are empty, heights are not
    /// strictly increasing, or timestamps regress.
    pub fn new(boundaries: &[BlockBoundary]) -> Result<Self, BoundaryError> {
        validate_boundaries(boundaries)?;

        let mut windows = Vec::with_capacity(boundaries.len());
        let mut last_timestamp = 0.0;
        for boundary in boundaries {
            windows.push(BlockWindow::new(
                boundary.height,
                last_timestamp,
                boundary.timestamp,
            ));
            last_timestamp = boundary.timestamp;
        }

        Ok(Self {
            windows,
            final_height: 0,
        })
    }

    /// Starts a pass for one exchange's tick stream.
    ///
    /// The pass borrows the aggregator mutably, so passes cannot overlap.
    pub fn begin_pass(&mut self, exchange: Exchange) -> SourcePass<'_> {
        debug!(exchange = %exchange, windows = self.windows.len(), "beginning source pass");
        SourcePass {
            aggregator: self,
            exchange,
            cursor: 0,
            carry: 0.0,
            reach: 0,
            exhausted: false,
            last_timestamp: 0.0,
            ticks_read: 0,
            ticks_merged: 0,
            below_floor: 0,
            out_of_order: 0,
            unplaceable: 0,
            after_end: 0,
        }
    }

    /// Highest block height any finished pass has stepped off, i.e. the
    /// last fully covered block across all sources.
    #[must_use]
    pub const fn final_height(&self) -> u64 {
        self.final_height
    }

    /// The window sequence in ascending height order.
    #[must_use]
    pub fn windows(&self) -> &[BlockWindow] {
        &self.windows
    }

    /// Number of windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True if the aggregator holds no windows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Consumes the aggregator and returns the finished windows.
    ///
    /// Ticks still buffered in a parked window (a source whose stream ended
    /// mid-window) are consolidated here so no accepted trade is lost.
    #[must_use]
    pub fn into_windows(mut self) -> Vec<BlockWindow> {
        for window in &mut self.windows {
            window.consolidate();
        }
        self.windows
    }
}

/// A single exchange's forward-only walk over the shared windows.
///
/// Feed ticks in ascending timestamp order. When a tick no longer fits the
/// live window, the pass consolidates it, carries its close forward into
/// any never-seen window it advances onto, and moves on. Call
/// [`finish`](Self::finish) to fold the pass's coverage watermark into the
/// aggregator and obtain the ingestion statistics; a pass dropped without
/// finishing keeps its merges but contributes nothing to the watermark.
#[derive(Debug)]
pub struct SourcePass<'a> {
    aggregator: &'a mut BlockAggregator,
    exchange: Exchange,
    cursor: usize,
    carry: f64,
    reach: u64,
    exhausted: bool,
    last_timestamp: f64,
    ticks_read: u64,
    ticks_merged: u64,
    below_floor: u64,
    out_of_order: u64,
    unplaceable: u64,
    after_end: u64,
}

impl SourcePass<'_> {
    /// Feeds one tick through the advance rule.
    pub fn feed(&mut self, tick: Tick) {
        self.ticks_read += 1;

        if tick.timestamp < TICK_TIMESTAMP_FLOOR {
            self.below_floor += 1;
            return;
        }

        if tick.timestamp < self.last_timestamp {
            self.out_of_order += 1;
        }
        self.last_timestamp = tick.timestamp;

        if self.exhausted {
            self.after_end += 1;
            return;
        }

        // A regression past the live window's start can never be placed,
        // the cursor only moves forward. Dropping it here keeps one bad
        // record from consuming the rest of the window sequence.
        if tick.timestamp < self.aggregator.windows[self.cursor].opentime() {
            self.unplaceable += 1;
            return;
        }

        loop {
            if self.aggregator.windows[self.cursor].offer(tick) {
                self.ticks_merged += 1;
                return;
            }
            self.step_off();
            if self.exhausted {
                self.after_end += 1;
                return;
            }
        }
    }

    /// Consolidates the live window, carries its close, and advances.
    fn step_off(&mut self) {
        let window = &mut self.aggregator.windows[self.cursor];
        window.consolidate();
        self.carry = window.close();
        self.reach = window.height();

        self.cursor += 1;
        if self.cursor == self.aggregator.windows.len() {
            self.exhausted = true;
            return;
        }

        let next = &mut self.aggregator.windows[self.cursor];
        if !next.seen() {
            next.fill(self.carry);
        }
    }

    /// The exchange this pass ingests.
    #[must_use]
    pub const fn exchange(&self) -> Exchange {
        self.exchange
    }

    /// Finishes the pass: folds its coverage watermark into the aggregator
    /// and returns the ingestion statistics.
    #[must_use]
    pub fn finish(self) -> PassSummary {
        self.aggregator.final_height = self.aggregator.final_height.max(self.reach);

        if self.out_of_order > 0 {
            warn!(
                exchange = %self.exchange,
                count = self.out_of_order,
                "tick timestamps regressed within the source stream"
            );
        }
        if self.unplaceable > 0 {
            warn!(
                exchange = %self.exchange,
                count = self.unplaceable,
                "dropped ticks that regressed past the live window"
            );
        }
        debug!(
            exchange = %self.exchange,
            merged = self.ticks_merged,
            reach = self.reach,
            "source pass finished"
        );

        PassSummary {
            exchange: self.exchange,
            ticks_read: self.ticks_read,
            ticks_merged: self.ticks_merged,
            below_floor: self.below_floor,
            out_of_order: self.out_of_order,
            unplaceable: self.unplaceable,
            after_end: self.after_end,
            final_height: self.reach,
        }
    }
}

/// Ingestion statistics for one finished source pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// The exchange the pass ingested.
    pub exchange: Exchange,
    /// Total ticks fed.
    pub ticks_read: u64,
    /// Ticks buffered into a window.
    pub ticks_merged: u64,
    /// Ticks discarded by the spurious-timestamp floor.
    pub below_floor: u64,
    /// Ticks whose timestamp was lower than their predecessor's. Those
    /// still inside the live window are merged anyway (the per-window sort
    /// repairs intra-window disorder); this count is diagnostic.
    pub out_of_order: u64,
    /// Out-of-order ticks that regressed past the live window and were
    /// dropped.
    pub unplaceable: u64,
    /// Ticks dropped because the stream ran past the last boundary.
    pub after_end: u64,
    /// Highest block height this pass fully covered.
    pub final_height: u64,
}

impl PassSummary {
    /// Total ticks discarded for any reason.
    #[must_use]
    pub const fn discarded(&self) -> u64 {
        self.below_floor + self.unplaceable + self.after_end
    }
}
