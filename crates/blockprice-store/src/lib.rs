//! Price table construction and persistence for blockprice.
//!
//! - [`TableBuilder`] - Publication policy over a finished aggregation
//! - [`PriceTable`] - The immutable height-keyed lookup table
//! - [`TableStore`] - Atomic JSON persistence in the platform data dir

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod store;
mod table;

pub use store::{Result, StoreError, TableStore};
pub use table::{
    DEFAULT_PRICED_HEIGHT_FLOOR, DEFAULT_PUBLISH_LAG, PriceTable, TableBuilder,
};
