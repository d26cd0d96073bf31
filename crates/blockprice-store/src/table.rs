//! The published price table and its construction policy.

use blockprice_aggregate::BlockAggregator;
use blockprice_types::BlockPrice;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Default number of blocks held back behind the coverage watermark.
///
/// Exchange dumps trail the chain; holding the tail back means the next
/// incremental run re-aggregates those blocks with complete data instead
/// of contradicting an already-published record.
pub const DEFAULT_PUBLISH_LAG: u64 = 10;

/// Default height above which a window that never received a price is
/// dropped rather than published with a zero open.
///
/// Below this height, zero-open records are genuine (the chain predates
/// the earliest exchange data) and are kept.
pub const DEFAULT_PRICED_HEIGHT_FLOOR: u64 = 700_000;

/// Publication policy turning a finished [`BlockAggregator`] into a
/// [`PriceTable`].
#[derive(Debug, Clone, Copy)]
pub struct TableBuilder {
    publish_lag: u64,
    priced_height_floor: u64,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self {
            publish_lag: DEFAULT_PUBLISH_LAG,
            priced_height_floor: DEFAULT_PRICED_HEIGHT_FLOOR,
        }
    }
}

impl TableBuilder {
    /// Creates a builder with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many blocks behind the coverage watermark to hold back.
    #[must_use]
    pub const fn publish_lag(mut self, lag: u64) -> Self {
        self.publish_lag = lag;
        self
    }

    /// Sets the height above which zero-open windows are dropped.
    #[must_use]
    pub const fn priced_height_floor(mut self, floor: u64) -> Self {
        self.priced_height_floor = floor;
        self
    }

    /// Consumes the aggregation and produces the publishable table.
    ///
    /// A window is published when its height is strictly below
    /// `final_height - publish_lag` and it is not a zero-open window above
    /// the priced-height floor.
    #[must_use]
    pub fn build(&self, aggregator: BlockAggregator) -> PriceTable {
        let cutoff = aggregator.final_height().saturating_sub(self.publish_lag);

        let mut records = BTreeMap::new();
        for window in aggregator.into_windows() {
            let price = window.to_price();
            if price.block_height >= cutoff {
                break; // windows are ascending; everything further is held back
            }
            if price.block_height > self.priced_height_floor && price.is_zero_open() {
                continue;
            }
            records.insert(price.block_height, price);
        }

        debug!(records = records.len(), cutoff, "built price table");
        PriceTable { records }
    }
}

/// The published per-block price table, keyed by block height.
///
/// Immutable once built: refreshing means building or loading a new table
/// and swapping the reference. Serializes as a plain JSON object mapping
/// height to record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    records: BTreeMap<u64, BlockPrice>,
}

impl PriceTable {
    /// Assembles a table from records directly, keyed by their height.
    ///
    /// Aggregation goes through [`TableBuilder`]; this exists for tools
    /// and tests that already hold finished records.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = BlockPrice>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|price| (price.block_height, price))
                .collect(),
        }
    }

    /// Looks up the record for a block height.
    #[must_use]
    pub fn get(&self, height: u64) -> Option<&BlockPrice> {
        self.records.get(&height)
    }

    /// Lowest published height.
    #[must_use]
    pub fn min_height(&self) -> Option<u64> {
        self.records.keys().next().copied()
    }

    /// Highest published height.
    #[must_use]
    pub fn max_height(&self) -> Option<u64> {
        self.records.keys().next_back().copied()
    }

    /// Lowest and highest published heights.
    #[must_use]
    pub fn known_range(&self) -> Option<(u64, u64)> {
        Some((self.min_height()?, self.max_height()?))
    }

    /// The record with the highest height.
    #[must_use]
    pub fn latest(&self) -> Option<&BlockPrice> {
        self.records.values().next_back()
    }

    /// Number of published records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in ascending height order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockPrice> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use blockprice_types::{BlockBoundary, Exchange, Tick};

    const BASE: f64 = 1_500_000_000.0;

    /// Seven windows, trades in the second and sixth, so the pass covers
    /// the first five heights and parks in the sixth.
    fn aggregate(first_height: u64) -> BlockAggregator {
        let boundaries: Vec<BlockBoundary> = (0..7)
            .map(|i| BlockBoundary::new(first_height + i, BASE + 1_000.0 * (i as f64 + 1.0)))
            .collect();
        let mut agg = BlockAggregator::new(&boundaries).unwrap();
        let mut pass = agg.begin_pass(Exchange::Bitstamp);
        pass.feed(Tick::new(BASE + 1_500.0, 50.0, 1.0, Exchange::Bitstamp));
        pass.feed(Tick::new(BASE + 5_500.0, 60.0, 2.0, Exchange::Bitstamp));
        let _ = pass.finish();
        agg
    }

    #[test]
    fn test_tail_trim() {
        // Watermark is first+4; lag 2 keeps heights below first+2.
        let table = TableBuilder::new()
            .publish_lag(2)
            .build(aggregate(100));

        assert_eq!(table.len(), 2);
        assert_eq!(table.known_range(), Some((100, 101)));
        assert!(table.get(102).is_none());
        assert!(table.get(104).is_none());
    }

    #[test]
    fn test_zero_open_kept_below_floor() {
        let table = TableBuilder::new()
            .publish_lag(2)
            .build(aggregate(100));

        // Height 100 never traded and never got a carry; ancient blocks
        // keep their zero-open record.
        let first = table.get(100).unwrap();
        assert!(first.is_zero_open());
        assert_relative_eq!(table.get(101).unwrap().close, 50.0);
    }

    #[test]
    fn test_zero_open_dropped_above_floor() {
        let table = TableBuilder::new()
            .publish_lag(2)
            .build(aggregate(700_001));

        assert_eq!(table.len(), 1);
        assert!(table.get(700_001).is_none());
        assert!(table.get(700_002).is_some());
    }

    #[test]
    fn test_empty_when_lag_swallows_coverage() {
        let table = TableBuilder::new().build(aggregate(100));
        // Watermark 104, default lag 10: nothing clears the cutoff.
        assert!(table.is_empty());
        assert_eq!(table.known_range(), None);
    }

    #[test]
    fn test_published_records_are_adjacent() {
        // Thirty 600-second windows, ticks trickling through all of them;
        // every published record must close exactly where the next opens.
        let boundaries: Vec<BlockBoundary> = (0..30)
            .map(|i| BlockBoundary::new(100 + i, BASE + 600.0 * (i as f64 + 1.0)))
            .collect();
        let mut agg = BlockAggregator::new(&boundaries).unwrap();
        let mut pass = agg.begin_pass(Exchange::Kraken);
        for i in 0..300u32 {
            let at = BASE + 650.0 + f64::from(i) * 55.0;
            pass.feed(Tick::new(at, 40.0 + f64::from(i % 9), 0.5, Exchange::Kraken));
        }
        let _ = pass.finish();

        let table = TableBuilder::new().publish_lag(2).build(agg);
        assert!(table.len() > 2);

        let records: Vec<_> = table.iter().collect();
        for pair in records.windows(2) {
            assert_eq!(pair[0].block_height + 1, pair[1].block_height);
            assert_relative_eq!(pair[0].closetime, pair[1].opentime);
        }
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let a = TableBuilder::new().publish_lag(2).build(aggregate(100));
        let b = TableBuilder::new().publish_lag(2).build(aggregate(100));

        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_serializes_as_height_keyed_object() {
        let table = TableBuilder::new()
            .publish_lag(2)
            .build(aggregate(100));
        let json = serde_json::to_string(&table).unwrap();

        assert!(json.starts_with("{\"100\":"));
        assert!(json.contains("\"block_height\":101"));
        assert!(json.contains("\"opentime\":"));
    }

    #[test]
    fn test_from_records() {
        let record = BlockPrice {
            block_height: 42,
            opentime: 0.0,
            closetime: 1.0,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 3.0,
        };
        let table = PriceTable::from_records([record]);
        assert_eq!(table.len(), 1);
        assert_relative_eq!(table.latest().unwrap().close, 1.5);
    }
}
