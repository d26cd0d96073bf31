//! Local-file ingestion for blockprice.
//!
//! - [`read_boundaries`] - Parses `height,timestamp` boundary files
//! - [`TickFileReader`] - Streams ticks from (optionally gzipped) CSV dumps
//! - [`discover_sources`] - Finds exchange dumps in a data directory

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod boundaries;
mod ticks;

pub use boundaries::read_boundaries;
pub use ticks::{TickFileReader, discover_sources};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading input files.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Failed to open an input file.
    #[error("Failed to open '{path}': {source}")]
    Open {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read an input file.
    #[error("Failed to read '{path}': {source}")]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A tick record did not parse; the csv error carries the position.
    #[error("Malformed tick record in '{path}': {source}")]
    Tick {
        /// The dump being read.
        path: PathBuf,
        /// The underlying CSV error.
        source: csv::Error,
    },

    /// A boundary line did not parse.
    #[error("Malformed boundary line {line} in '{path}': '{text}'")]
    Boundary {
        /// The boundary file being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
