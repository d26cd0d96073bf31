//! Query service over a loaded price table.

use blockprice_store::PriceTable;
use blockprice_types::BlockPrice;
use thiserror::Error;

/// Satoshis in one bitcoin.
pub const SATS_PER_BTC: f64 = 100_000_000.0;

/// Why a point lookup could not return a record.
///
/// "Too recent" and "no data" are distinct so the caller can word them
/// differently: the former invites retrying after the next aggregation
/// run, the latter means the block exists in range but was published
/// without a price.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// The height lies beyond the highest published block.
    #[error("Block {height} is too recent; the table ends at block {max_height}")]
    TooRecent {
        /// The requested height.
        height: u64,
        /// The highest published height.
        max_height: u64,
    },

    /// The height is within the known range but has no record.
    #[error("No price data for block {height}")]
    NotPriced {
        /// The requested height.
        height: u64,
    },

    /// The table holds no records at all.
    #[error("The price table is empty; run an aggregation first")]
    Empty,
}

/// Result of a derived-metric query.
///
/// Derived metrics divide through the block's close, so two edge
/// conditions get sentinel values instead of numbers: a zero close
/// (the block predates exchange pricing) is [`Unbounded`](Self::Unbounded),
/// and a height outside the published table is
/// [`Undefined`](Self::Undefined).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quote {
    /// A finite result.
    Value(f64),
    /// The block predates pricing data; the metric grows without bound.
    Unbounded,
    /// The height has no published record to derive from.
    Undefined,
}

impl Quote {
    /// Returns the finite value, if there is one.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// True if the quote is a finite value.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Stateless point queries over an immutable [`PriceTable`].
///
/// The service borrows the table, so any number of callers can query one
/// loaded snapshot concurrently. Refreshing means loading a new table and
/// constructing a new service over it.
#[derive(Debug, Clone, Copy)]
pub struct QueryService<'a> {
    table: &'a PriceTable,
}

impl<'a> QueryService<'a> {
    /// Creates a service over a loaded table.
    #[must_use]
    pub const fn new(table: &'a PriceTable) -> Self {
        Self { table }
    }

    /// Returns the OHLCV record for a block height.
    ///
    /// # Errors
    ///
    /// [`QueryError::TooRecent`] when the height exceeds the highest
    /// published block, [`QueryError::NotPriced`] when the height is in
    /// range but has no record, [`QueryError::Empty`] when nothing was
    /// published.
    pub fn price_at(&self, height: u64) -> Result<&'a BlockPrice, QueryError> {
        let Some(max_height) = self.table.max_height() else {
            return Err(QueryError::Empty);
        };
        if height > max_height {
            return Err(QueryError::TooRecent { height, max_height });
        }
        self.table
            .get(height)
            .ok_or(QueryError::NotPriced { height })
    }

    /// Satoshis per dollar at a block, derived from the close.
    #[must_use]
    pub fn sats_per_usd(&self, height: u64) -> Quote {
        match self.price_at(height) {
            Ok(price) if price.close == 0.0 => Quote::Unbounded,
            Ok(price) => Quote::Value(SATS_PER_BTC / price.close),
            Err(_) => Quote::Undefined,
        }
    }

    /// Dollar value of a BTC amount at a block, through the close.
    #[must_use]
    pub fn usd_value(&self, height: u64, btc_amount: f64) -> Quote {
        match self.price_at(height) {
            Ok(price) if price.close == 0.0 => Quote::Unbounded,
            Ok(price) => Quote::Value(price.close * btc_amount),
            Err(_) => Quote::Undefined,
        }
    }

    /// BTC value of a dollar amount at a block, through the close.
    #[must_use]
    pub fn btc_value(&self, height: u64, usd_amount: f64) -> Quote {
        match self.price_at(height) {
            Ok(price) if price.close == 0.0 => Quote::Unbounded,
            Ok(price) => Quote::Value(usd_amount / price.close),
            Err(_) => Quote::Undefined,
        }
    }

    /// Lowest and highest published heights.
    #[must_use]
    pub fn known_range(&self) -> Option<(u64, u64)> {
        self.table.known_range()
    }

    /// Highest published height.
    #[must_use]
    pub fn max_height(&self) -> Option<u64> {
        self.table.max_height()
    }
}
