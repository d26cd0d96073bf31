//! Per-block OHLCV aggregation for blockprice.
//!
//! This crate provides the core aggregation engine:
//!
//! - [`BlockWindow`] - One block's price window with trade buffering
//! - [`BlockAggregator`] - Multi-source pass driver over a shared window sequence
//! - [`SourcePass`] - A single exchange's walk over the windows
//! - [`PassSummary`] - Per-source ingestion statistics

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod window;

pub use aggregator::{BlockAggregator, PassSummary, SourcePass, TICK_TIMESTAMP_FLOOR};
pub use window::BlockWindow;
