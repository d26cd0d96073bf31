//! Streaming tick dump reader.

use blockprice_types::{Exchange, Tick};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::IngestError;

/// Raw dump row: `timestamp,price,volume`, no header.
type RawRow = (f64, f64, f64);

/// Streams ticks from an exchange's full-history CSV dump.
///
/// Rows are `timestamp,price,volume` with no header line, ascending by
/// timestamp (the aggregator re-checks that). Paths ending in `.gz` are
/// gunzipped on the fly, so dumps can be fed straight from the downloader
/// without unpacking first.
pub struct TickFileReader {
    path: PathBuf,
    exchange: Exchange,
    rows: csv::DeserializeRecordsIntoIter<Box<dyn Read>, RawRow>,
}

impl TickFileReader {
    /// Opens a dump file for streaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, exchange: Exchange) -> crate::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| IngestError::Open {
            path: path.clone(),
            source: e,
        })?;

        let raw: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(raw)
            .into_deserialize();

        debug!(path = %path.display(), exchange = %exchange, "opened tick dump");
        Ok(Self {
            path,
            exchange,
            rows,
        })
    }

    /// The exchange this reader stamps onto every tick.
    #[must_use]
    pub const fn exchange(&self) -> Exchange {
        self.exchange
    }

    /// The dump path being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for TickFileReader {
    type Item = crate::Result<Tick>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(match row {
            Ok((timestamp, price, volume)) => {
                Ok(Tick::new(timestamp, price, volume, self.exchange))
            }
            Err(e) => Err(IngestError::Tick {
                path: self.path.clone(),
                source: e,
            }),
        })
    }
}

impl std::fmt::Debug for TickFileReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickFileReader")
            .field("path", &self.path)
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}

/// Finds exchange dumps in a data directory.
///
/// For each supported exchange, in canonical order, looks for
/// `<dump_name>.csv` and then `<dump_name>.csv.gz`. Exchanges without a
/// dump are simply absent from the result.
#[must_use]
pub fn discover_sources(dir: &Path) -> Vec<(Exchange, PathBuf)> {
    let mut sources = Vec::new();
    for exchange in Exchange::all() {
        let plain = dir.join(format!("{}.csv", exchange.dump_name()));
        let gzipped = dir.join(format!("{}.csv.gz", exchange.dump_name()));
        if plain.is_file() {
            sources.push((*exchange, plain));
        } else if gzipped.is_file() {
            sources.push((*exchange, gzipped));
        }
    }
    sources
}
