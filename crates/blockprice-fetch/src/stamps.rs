//! Block timestamp synchronisation against the block REST API.

use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

use crate::{DownloadClient, Endpoints, FetchError};

/// How many blocks below the fetched tip the sync stops.
///
/// Boundary lines are append-only; staying this far behind the tip keeps
/// a chain reorg from invalidating lines already written.
pub const REORG_MARGIN: u64 = 15;

/// A block height paired with the timestamp fetched for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStamp {
    /// Block height.
    pub height: u64,
    /// Block timestamp in seconds since the Unix epoch.
    pub timestamp: u64,
}

impl BlockStamp {
    /// Renders the stamp as one boundary-file line (no newline).
    #[must_use]
    pub fn as_boundary_line(&self) -> String {
        format!("{},{}", self.height, self.timestamp)
    }
}

/// The slice of the block document the sync cares about.
#[derive(Debug, Deserialize)]
struct BlockInfo {
    timestamp: u64,
}

/// Fetches the current chain tip height.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not a decimal
/// height.
pub async fn fetch_tip_height(
    client: &DownloadClient,
    endpoints: &Endpoints,
) -> crate::Result<u64> {
    let url = endpoints.tip_height_url();
    let body = client
        .download(&url)
        .await?
        .ok_or_else(|| FetchError::BadPayload {
            url: url.clone(),
            detail: "tip height endpoint answered 404".to_string(),
        })?;

    let text = String::from_utf8_lossy(&body);
    text.trim()
        .parse::<u64>()
        .map_err(|e| FetchError::BadPayload {
            url,
            detail: format!("'{}' is not a block height: {e}", text.trim()),
        })
}

/// Fetches the timestamp of the block at a height.
///
/// Two requests, matching the API shape: height to hash, then hash to
/// the block document carrying the timestamp.
///
/// # Errors
///
/// Returns [`FetchError::MissingBlock`] if the height is unknown, or an
/// error if a request fails or a payload is malformed.
pub async fn fetch_stamp(
    client: &DownloadClient,
    endpoints: &Endpoints,
    height: u64,
) -> crate::Result<BlockStamp> {
    let hash_url = endpoints.block_hash_url(height);
    let hash_body = client
        .download(&hash_url)
        .await?
        .ok_or(FetchError::MissingBlock { height })?;
    let hash = String::from_utf8_lossy(&hash_body).trim().to_string();

    let block_url = endpoints.block_url(&hash);
    let block_body = client
        .download(&block_url)
        .await?
        .ok_or(FetchError::MissingBlock { height })?;

    let info: BlockInfo =
        serde_json::from_slice(&block_body).map_err(|e| FetchError::BadPayload {
            url: block_url,
            detail: e.to_string(),
        })?;

    debug!(height, timestamp = info.timestamp, "fetched block stamp");
    Ok(BlockStamp {
        height,
        timestamp: info.timestamp,
    })
}

/// Streams stamps for a height range, in ascending height order.
///
/// Requests run with the client's configured concurrency, but results
/// are yielded in order so the caller can append them straight to the
/// boundary file. Any failure ends the stream with that error.
pub fn stamp_stream<'a>(
    client: &'a DownloadClient,
    endpoints: &'a Endpoints,
    heights: RangeInclusive<u64>,
) -> impl Stream<Item = crate::Result<BlockStamp>> + 'a {
    let concurrency = client.config().concurrency;
    stream::iter(heights)
        .map(move |height| fetch_stamp(client, endpoints, height))
        .buffered(concurrency)
}
