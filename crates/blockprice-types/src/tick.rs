//! Trade tick representation.

use serde::{Deserialize, Serialize};

use crate::Exchange;

/// A single historical trade from an exchange's full-history dump.
///
/// Timestamps are seconds since the Unix epoch, kept as `f64` because
/// that is what the dump files carry; prices are USD per BTC and volumes
/// are BTC amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Trade time in seconds since the Unix epoch.
    pub timestamp: f64,
    /// Trade price in USD per BTC.
    pub price: f64,
    /// Traded amount in BTC.
    pub volume: f64,
    /// The exchange this trade was executed on.
    pub exchange: Exchange,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub const fn new(timestamp: f64, price: f64, volume: f64, exchange: Exchange) -> Self {
        Self {
            timestamp,
            price,
            volume,
            exchange,
        }
    }

    /// Returns the USD notional of this trade (price * volume).
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.price * self.volume
    }
}
