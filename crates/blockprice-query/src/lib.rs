//! Point queries over the published blockprice table.
//!
//! - [`QueryService`] - Stateless queries borrowing a loaded `PriceTable`
//! - [`QueryError`] - Distinguishes "too recent" from "no data"
//! - [`Quote`] - Derived-metric result with unbounded/undefined sentinels

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod service;

pub use service::{QueryError, QueryService, Quote, SATS_PER_BTC};
