//! A single block's price window.

use blockprice_types::{BlockPrice, Tick};

/// One block's OHLCV window over `[opentime, closetime]`.
///
/// A window buffers the ticks offered to it and folds them into its
/// running OHLCV fields when [`consolidate`](Self::consolidate) is called.
/// Consolidation can happen once per source pass; open and close are
/// decided by the earliest and latest trade seen across *all*
/// consolidations (tracked via the retained first/last ticks), high and
/// low only ever tighten, and volume accumulates.
///
/// Both bounds admit ticks. A tick landing exactly on a boundary shared
/// with the next window belongs here, because the pass cursor only moves
/// forward once this window stops admitting.
#[derive(Debug, Clone)]
pub struct BlockWindow {
    height: u64,
    opentime: f64,
    closetime: f64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    seen: bool,
    first_tick: Option<Tick>,
    last_tick: Option<Tick>,
    pending: Vec<Tick>,
}

impl BlockWindow {
    /// Creates an empty window for the given block.
    #[must_use]
    pub(crate) const fn new(height: u64, opentime: f64, closetime: f64) -> Self {
        Self {
            height,
            opentime,
            closetime,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: 0.0,
            seen: false,
            first_tick: None,
            last_tick: None,
            pending: Vec::new(),
        }
    }

    /// Offers a tick to this window.
    ///
    /// Returns `true` and buffers the tick when its timestamp falls inside
    /// `[opentime, closetime]`, `false` otherwise.
    pub fn offer(&mut self, tick: Tick) -> bool {
        if tick.timestamp >= self.opentime && tick.timestamp <= self.closetime {
            self.pending.push(tick);
            true
        } else {
            false
        }
    }

    /// Folds all buffered ticks into the running OHLCV fields.
    ///
    /// The buffer is sorted by timestamp first (the sort is stable, so
    /// arrival order breaks timestamp ties), then open/close are updated
    /// from the earliest and latest trades seen so far, extremes are
    /// tightened, and volume is added. The buffer is cleared afterwards.
    pub fn consolidate(&mut self) {
        self.pending
            .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let mut earliest = self.first_tick.map_or(f64::INFINITY, |t| t.timestamp);
        let mut latest = self.last_tick.map_or(0.0, |t| t.timestamp);

        for tick in &self.pending {
            if tick.timestamp < earliest {
                earliest = tick.timestamp;
                self.first_tick = Some(*tick);
                self.open = tick.price;
            }
            if tick.timestamp > latest {
                latest = tick.timestamp;
                self.last_tick = Some(*tick);
                self.close = tick.price;
            }
            if tick.price > self.high {
                self.high = tick.price;
            }
            if tick.price < self.low {
                self.low = tick.price;
            }
            self.volume += tick.volume;
        }
        self.pending.clear();
    }

    /// Seeds a window that no trade ever reached with the carried-forward
    /// close of the preceding window.
    ///
    /// Sets all four price fields to `previous_close` and marks the window
    /// seen, so a later pass does not overwrite the seed. Ticks offered
    /// after filling still merge normally on the next consolidation.
    pub fn fill(&mut self, previous_close: f64) {
        self.open = previous_close;
        self.high = previous_close;
        self.low = previous_close;
        self.close = previous_close;
        self.seen = true;
    }

    /// Converts the consolidated window into its published record.
    #[must_use]
    pub fn to_price(&self) -> BlockPrice {
        BlockPrice {
            block_height: self.height,
            opentime: self.opentime,
            closetime: self.closetime,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }

    /// Block height of this window.
    #[must_use]
    pub const fn height(&self) -> u64 {
        self.height
    }

    /// Window start (the previous block's timestamp).
    #[must_use]
    pub const fn opentime(&self) -> f64 {
        self.opentime
    }

    /// Window end (this block's timestamp).
    #[must_use]
    pub const fn closetime(&self) -> f64 {
        self.closetime
    }

    /// Last consolidated (or carried) close.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.close
    }

    /// True once the window has been seeded by carry-forward fill.
    #[must_use]
    pub const fn seen(&self) -> bool {
        self.seen
    }

    /// Number of buffered ticks awaiting consolidation.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
