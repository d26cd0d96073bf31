//! Per-block Bitcoin OHLCV aggregation and lookup.
//!
//! This is a facade crate that re-exports functionality from the
//! blockprice workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use blockprice_lib::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let boundaries = read_boundaries("timestamps.txt")?;
//!     let mut aggregator = BlockAggregator::new(&boundaries)?;
//!
//!     for exchange in Exchange::all() {
//!         let reader = TickFileReader::open(
//!             format!("{}.csv.gz", exchange.dump_name()),
//!             *exchange,
//!         )?;
//!         let mut pass = aggregator.begin_pass(*exchange);
//!         for tick in reader {
//!             pass.feed(tick?);
//!         }
//!         let summary = pass.finish();
//!         println!("{}: {} ticks merged", exchange, summary.ticks_merged);
//!     }
//!
//!     let table = TableBuilder::new().build(aggregator);
//!     let service = QueryService::new(&table);
//!     println!("{:?}", service.price_at(734_241)?);
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use blockprice_types::*;

// Re-export ingestion
#[cfg(feature = "ingest")]
pub use blockprice_ingest::{IngestError, TickFileReader, discover_sources, read_boundaries};

// Re-export the aggregation engine
#[cfg(feature = "aggregate")]
pub use blockprice_aggregate::{
    BlockAggregator, BlockWindow, PassSummary, SourcePass, TICK_TIMESTAMP_FLOOR,
};

// Re-export table construction and persistence
#[cfg(feature = "store")]
pub use blockprice_store::{PriceTable, StoreError, TableBuilder, TableStore};

// Re-export queries
#[cfg(feature = "query")]
pub use blockprice_query::{QueryError, QueryService, Quote, SATS_PER_BTC};

// Re-export data acquisition
#[cfg(feature = "fetch")]
pub use blockprice_fetch::{
    BlockStamp, ClientConfig, DEFAULT_MEMPOOL_URL, DEFAULT_PRICE_DATA_URL, DownloadClient,
    DumpDownload, Endpoints, FetchError, REORG_MARGIN, download_dump, fetch_stamp,
    fetch_tip_height, stamp_stream,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use blockprice_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat};

/// Prelude module for convenient imports.
///
/// ```
/// use blockprice_lib::prelude::*;
/// ```
pub mod prelude {
    pub use blockprice_types::{
        BlockBoundary, BlockPrice, BlockpriceError, Exchange, Result, Tick,
    };

    #[cfg(feature = "ingest")]
    pub use blockprice_ingest::{TickFileReader, discover_sources, read_boundaries};

    #[cfg(feature = "aggregate")]
    pub use blockprice_aggregate::{BlockAggregator, BlockWindow, PassSummary};

    #[cfg(feature = "store")]
    pub use blockprice_store::{PriceTable, TableBuilder, TableStore};

    #[cfg(feature = "query")]
    pub use blockprice_query::{QueryError, QueryService, Quote};

    #[cfg(feature = "fetch")]
    pub use blockprice_fetch::{
        ClientConfig, DownloadClient, Endpoints, download_dump, fetch_tip_height, stamp_stream,
    };

    #[cfg(feature = "format")]
    pub use blockprice_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
