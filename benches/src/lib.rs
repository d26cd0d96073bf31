//! Synthetic fixture generators for the blockprice benchmarks.
//!
//! Everything here is deterministic: the same arguments always produce the
//! same boundaries and ticks, so benchmark runs are comparable across
//! machines and revisions.

use blockprice_types::{BlockBoundary, Exchange, Tick};

/// Epoch base for synthetic data, above the spurious-timestamp floor.
pub const SYNTHETIC_BASE: f64 = 1_500_000_000.0;

/// Average block interval used for synthetic boundaries, in seconds.
pub const BLOCK_INTERVAL: f64 = 600.0;

/// Generates `count` block boundaries starting at `first_height`.
///
/// Intervals wobble around [`BLOCK_INTERVAL`] with a deterministic
/// zig-zag so windows are not all the same width.
#[must_use]
pub fn synthetic_boundaries(first_height: u64, count: u64) -> Vec<BlockBoundary> {
    let mut timestamp = SYNTHETIC_BASE;
    (0..count)
        .map(|i| {
            let wobble = ((i % 7) as f64 - 3.0) * 60.0;
            timestamp += BLOCK_INTERVAL + wobble;
            BlockBoundary::new(first_height + i, timestamp)
        })
        .collect()
}

/// Generates a timestamp-ordered tick stream spanning the given boundaries.
///
/// Produces `per_block` ticks per block interval. Prices follow a bounded
/// deterministic walk seeded from the exchange, so different sources
/// disagree the way real feeds do.
#[must_use]
pub fn synthetic_ticks(
    boundaries: &[BlockBoundary],
    exchange: Exchange,
    per_block: u64,
) -> Vec<Tick> {
    let Some(last) = boundaries.last() else {
        return Vec::new();
    };

    let total = boundaries.len() as u64 * per_block;
    let span = last.timestamp - SYNTHETIC_BASE;
    let step = span / total as f64;

    let mut price = 20_000.0 + f64::from(exchange as u8) * 250.0;
    let mut state: u64 = 0x9E37_79B9 ^ exchange as u64;

    (0..total)
        .map(|i| {
            // xorshift keeps the walk cheap and repeatable
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;

            let drift = ((state % 2_001) as f64 - 1_000.0) / 100.0;
            price = (price + drift).max(1.0);
            let volume = 0.01 + (state % 500) as f64 / 100.0;
            let timestamp = SYNTHETIC_BASE + step * (i as f64 + 1.0);
            Tick::new(timestamp, price, volume, exchange)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_strictly_increase() {
        let boundaries = synthetic_boundaries(100, 1_000);
        assert_eq!(boundaries.len(), 1_000);
        for pair in boundaries.windows(2) {
            assert!(pair[0].height < pair[1].height);
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_ticks_are_ordered_and_positive() {
        let boundaries = synthetic_boundaries(100, 50);
        let ticks = synthetic_ticks(&boundaries, Exchange::Bitstamp, 20);
        assert_eq!(ticks.len(), 1_000);
        for pair in ticks.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        assert!(ticks.iter().all(|t| t.price > 0.0 && t.volume > 0.0));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let boundaries = synthetic_boundaries(100, 10);
        let a = synthetic_ticks(&boundaries, Exchange::Kraken, 5);
        let b = synthetic_ticks(&boundaries, Exchange::Kraken, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sources_differ() {
        let boundaries = synthetic_boundaries(100, 10);
        let a = synthetic_ticks(&boundaries, Exchange::Bitstamp, 5);
        let b = synthetic_ticks(&boundaries, Exchange::Coinbase, 5);
        assert_ne!(a[0].price, b[0].price);
    }
}
