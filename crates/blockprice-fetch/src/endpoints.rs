//! URL construction for the dump archive and the block API.

use blockprice_types::Exchange;

/// Default base URL for full-history exchange dumps.
pub const DEFAULT_PRICE_DATA_URL: &str = "https://api.bitcoincharts.com/v1/csv/";

/// Default base URL for the block REST API.
pub const DEFAULT_MEMPOOL_URL: &str = "https://mempool.space/api/";

/// Base URLs for the two upstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    price_data_url: String,
    mempool_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_DATA_URL, DEFAULT_MEMPOOL_URL)
    }
}

impl Endpoints {
    /// Creates endpoints from base URLs; a missing trailing slash is
    /// added so path joins stay simple.
    #[must_use]
    pub fn new(price_data_url: &str, mempool_url: &str) -> Self {
        Self {
            price_data_url: with_trailing_slash(price_data_url),
            mempool_url: with_trailing_slash(mempool_url),
        }
    }

    /// URL of an exchange's full-history dump, e.g.
    /// `https://api.bitcoincharts.com/v1/csv/bitstampUSD.csv.gz`.
    #[must_use]
    pub fn dump_url(&self, exchange: Exchange) -> String {
        format!("{}{}.csv.gz", self.price_data_url, exchange.dump_name())
    }

    /// URL returning the chain tip height as plain text.
    #[must_use]
    pub fn tip_height_url(&self) -> String {
        format!("{}blocks/tip/height", self.mempool_url)
    }

    /// URL returning the block hash at a height as plain text.
    #[must_use]
    pub fn block_hash_url(&self, height: u64) -> String {
        format!("{}block-height/{height}", self.mempool_url)
    }

    /// URL returning a block's JSON document by hash.
    #[must_use]
    pub fn block_url(&self, hash: &str) -> String {
        format!("{}block/{hash}", self.mempool_url)
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dump_url() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.dump_url(Exchange::Bitstamp),
            "https://api.bitcoincharts.com/v1/csv/bitstampUSD.csv.gz"
        );
    }

    #[test]
    fn test_block_api_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.tip_height_url(),
            "https://mempool.space/api/blocks/tip/height"
        );
        assert_eq!(
            endpoints.block_hash_url(734_241),
            "https://mempool.space/api/block-height/734241"
        );
        assert_eq!(
            endpoints.block_url("abc123"),
            "https://mempool.space/api/block/abc123"
        );
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let endpoints = Endpoints::new("https://mirror.example/csv", "https://node.example/api");
        assert_eq!(
            endpoints.dump_url(Exchange::Kraken),
            "https://mirror.example/csv/krakenUSD.csv.gz"
        );
        assert_eq!(
            endpoints.tip_height_url(),
            "https://node.example/api/blocks/tip/height"
        );
    }
}
