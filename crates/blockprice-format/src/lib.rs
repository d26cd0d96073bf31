//! Export formats for published blockprice records.
//!
//! - [`OutputFormat`] - Format identifier with `FromStr` and extensions
//! - [`Formatter`] - Trait over a slice of published records
//! - [`CsvFormatter`] - The canonical flat tabular export
//! - [`JsonFormatter`] - JSON array / NDJSON export

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

pub use csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
