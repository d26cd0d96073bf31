//! Core types for the blockprice workspace.
//!
//! This crate provides the fundamental data structures used throughout
//! blockprice:
//!
//! - [`Tick`] - A single historical trade with timestamp, price, and volume
//! - [`Exchange`] - The closed set of supported USD spot markets
//! - [`BlockBoundary`] - A block height paired with its timestamp
//! - [`BlockPrice`] - The published per-block OHLCV record

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod block;
mod error;
mod exchange;
mod tick;

pub use block::{BlockBoundary, BlockPrice, validate_boundaries};
pub use error::{BlockpriceError, BoundaryError, Result};
pub use exchange::{Exchange, ParseExchangeError};
pub use tick::Tick;
