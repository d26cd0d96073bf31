//! Network acquisition for blockprice input data.
//!
//! - [`DownloadClient`] - HTTP client with connection pooling and retries
//! - [`Endpoints`] - URL builders for the dump archive and the block API
//! - [`download_dump`] - Streams and unpacks an exchange's full-history dump
//! - [`stamp_stream`] - Ordered async stream of new block timestamps

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/blockprice/blockprice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod decompress;
mod dump;
mod endpoints;
mod stamps;

pub use client::{ClientConfig, DownloadClient, DownloadError};
pub use decompress::gunzip_file;
pub use dump::{DumpDownload, download_dump};
pub use endpoints::{DEFAULT_MEMPOOL_URL, DEFAULT_PRICE_DATA_URL, Endpoints};
pub use stamps::{BlockStamp, REORG_MARGIN, fetch_stamp, fetch_tip_height, stamp_stream};

use blockprice_types::Exchange;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while acquiring input data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP layer gave up after retries.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The archive has no dump for this exchange (404).
    #[error("No dump published for {exchange}")]
    DumpUnavailable {
        /// The exchange whose dump is missing.
        exchange: Exchange,
    },

    /// The block API has no block at this height (404).
    #[error("No block at height {height}")]
    MissingBlock {
        /// The requested height.
        height: u64,
    },

    /// A response body did not parse as expected.
    #[error("Unexpected payload from {url}: {detail}")]
    BadPayload {
        /// The URL that produced the payload.
        url: String,
        /// What went wrong with it.
        detail: String,
    },

    /// Writing a downloaded file failed.
    #[error("Failed to write '{path}': {source}")]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Unpacking a downloaded dump failed.
    #[error("Failed to gunzip '{path}': {source}")]
    Gunzip {
        /// The archive being unpacked.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A blocking unpack task was cancelled or panicked.
    #[error("Unpack task failed: {0}")]
    UnpackTask(#[from] tokio::task::JoinError),
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
