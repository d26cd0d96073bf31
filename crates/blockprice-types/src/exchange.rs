//! Supported exchange definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A supported USD spot market.
///
/// The set is closed: these are the exchanges whose full-history dumps the
/// aggregator understands. The derived `Ord` follows declaration order,
/// which is ascending by identifier (`bitstamp` < `coinbase` < `kraken` <
/// `mtgox`); this is the canonical processing order for multi-source
/// aggregation, so the last source to touch a shared block window is always
/// the same across runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    /// Bitstamp USD market.
    Bitstamp,
    /// Coinbase USD market.
    Coinbase,
    /// Kraken USD market.
    Kraken,
    /// Mt. Gox USD market (historical; closed 2014).
    MtGox,
}

impl Exchange {
    /// Returns the exchange identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Bitstamp => "bitstamp",
            Self::Coinbase => "coinbase",
            Self::Kraken => "kraken",
            Self::MtGox => "mtgox",
        }
    }

    /// Returns the dump file stem used by the upstream archive
    /// (e.g. `bitstampUSD` for `bitstampUSD.csv.gz`).
    #[must_use]
    pub const fn dump_name(&self) -> &'static str {
        match self {
            Self::Bitstamp => "bitstampUSD",
            Self::Coinbase => "coinbaseUSD",
            Self::Kraken => "krakenUSD",
            Self::MtGox => "mtgoxUSD",
        }
    }

    /// Returns all supported exchanges in canonical processing order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Bitstamp, Self::Coinbase, Self::Kraken, Self::MtGox]
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Exchange {
    type Err = ParseExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bitstamp" | "bitstampusd" => Ok(Self::Bitstamp),
            "coinbase" | "coinbaseusd" => Ok(Self::Coinbase),
            "kraken" | "krakenusd" => Ok(Self::Kraken),
            "mtgox" | "mtgoxusd" | "gox" => Ok(Self::MtGox),
            _ => Err(ParseExchangeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown exchange name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExchangeError(String);

impl std::fmt::Display for ParseExchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown exchange '{}', expected one of: bitstamp, coinbase, kraken, mtgox",
            self.0
        )
    }
}

impl std::error::Error for ParseExchangeError {}
