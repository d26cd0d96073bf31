//! Exchange dump download and unpack.

use blockprice_types::Exchange;
use futures::StreamExt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{DownloadClient, Endpoints, FetchError, gunzip_file};

/// Result of a completed dump download.
#[derive(Debug, Clone)]
pub struct DumpDownload {
    /// The exchange the dump covers.
    pub exchange: Exchange,
    /// The downloaded `.csv.gz` archive.
    pub gz_path: PathBuf,
    /// The unpacked CSV, ready for ingestion.
    pub csv_path: PathBuf,
    /// Bytes received over the wire.
    pub compressed_bytes: u64,
    /// Bytes after unpacking.
    pub decompressed_bytes: u64,
}

/// Downloads an exchange's full-history dump into `dir` and unpacks it.
///
/// The `.csv.gz` body is streamed straight to disk (dumps run to
/// gigabytes), with `on_bytes` called once per received chunk so the
/// caller can render progress. Unpacking runs on the blocking thread
/// pool. Both the archive and the plain CSV are left in `dir` under
/// the upstream file names.
///
/// # Errors
///
/// Returns [`FetchError::DumpUnavailable`] if the archive answers 404,
/// or an error if the download, write, or unpack fails.
pub async fn download_dump(
    client: &DownloadClient,
    endpoints: &Endpoints,
    exchange: Exchange,
    dir: &Path,
    mut on_bytes: impl FnMut(u64),
) -> crate::Result<DumpDownload> {
    let url = endpoints.dump_url(exchange);
    let gz_path = dir.join(format!("{}.csv.gz", exchange.dump_name()));
    let csv_path = dir.join(format!("{}.csv", exchange.dump_name()));

    let Some(response) = client.get(&url).await? else {
        return Err(FetchError::DumpUnavailable { exchange });
    };

    debug!(exchange = %exchange, url, "streaming dump to disk");
    let mut writer = BufWriter::new(File::create(&gz_path).map_err(|e| FetchError::Write {
        path: gz_path.clone(),
        source: e,
    })?);

    let mut compressed_bytes = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(crate::DownloadError::Http)?;
        writer.write_all(&chunk).map_err(|e| FetchError::Write {
            path: gz_path.clone(),
            source: e,
        })?;
        compressed_bytes += chunk.len() as u64;
        on_bytes(chunk.len() as u64);
    }
    writer.flush().map_err(|e| FetchError::Write {
        path: gz_path.clone(),
        source: e,
    })?;

    // Gunzip is CPU-bound; keep it off the async executor.
    let (gz, csv) = (gz_path.clone(), csv_path.clone());
    let decompressed_bytes = tokio::task::spawn_blocking(move || gunzip_file(&gz, &csv))
        .await?
        .map_err(|e| FetchError::Gunzip {
            path: gz_path.clone(),
            source: e,
        })?;

    debug!(
        exchange = %exchange,
        compressed_bytes,
        decompressed_bytes,
        "dump downloaded and unpacked"
    );

    Ok(DumpDownload {
        exchange,
        gz_path,
        csv_path,
        compressed_bytes,
        decompressed_bytes,
    })
}
