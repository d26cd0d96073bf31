//! Aggregate command implementation.
//!
//! Runs the batch: boundaries in, one pass per exchange in canonical
//! order, then the publish step (JSON table + flat export). The run is
//! all-or-nothing; any ingest failure aborts before anything is written.

use anyhow::{Context, Result, bail};
use blockprice_lib::FormatError;
use blockprice_lib::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;

#[allow(clippy::too_many_arguments)]
pub(crate) fn aggregate(
    config: &Config,
    timestamps: Option<PathBuf>,
    sources: &[String],
    data_dir: Option<PathBuf>,
    publish_lag: Option<u64>,
    priced_height_floor: Option<u64>,
    export_format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let data_dir = config.data_dir(data_dir);
    let timestamps = timestamps.unwrap_or_else(|| data_dir.join("timestamps.txt"));

    let boundaries = read_boundaries(&timestamps)
        .with_context(|| format!("Failed to read block boundaries from {}", timestamps.display()))?;

    let mut tick_sources = resolve_sources(sources, &data_dir)?;
    // Canonical processing order: ascending by exchange id, so ties on
    // contested windows always resolve the same way between runs.
    tick_sources.sort_by_key(|(exchange, _)| *exchange);

    let mut aggregator =
        BlockAggregator::new(&boundaries).context("Invalid block boundary sequence")?;

    for (exchange, path) in &tick_sources {
        let progress = source_progress(quiet, *exchange);

        let reader = TickFileReader::open(path, *exchange)
            .with_context(|| format!("Failed to open tick dump {}", path.display()))?;

        let mut pass = aggregator.begin_pass(*exchange);
        for tick in reader {
            let tick = tick.with_context(|| {
                format!("Aborting: corrupt record in {} (nothing was published)", path.display())
            })?;
            pass.feed(tick);
        }
        let summary = pass.finish();

        progress.finish_and_clear();
        if !quiet {
            println!(
                "{}: {} ticks merged, {} discarded, covered through block {}",
                summary.exchange,
                summary.ticks_merged,
                summary.discarded(),
                summary.final_height
            );
        }
    }

    let final_height = aggregator.final_height();
    let mut builder = TableBuilder::new();
    if let Some(lag) = config.publish_lag(publish_lag) {
        builder = builder.publish_lag(lag);
    }
    if let Some(floor) = config.priced_height_floor(priced_height_floor) {
        builder = builder.priced_height_floor(floor);
    }
    let table = builder.build(aggregator);

    if table.is_empty() {
        bail!(
            "Nothing to publish: coverage reached block {final_height}, \
             which the publish lag holds back entirely"
        );
    }

    let store = TableStore::new(data_dir).context("Failed to open the data directory")?;
    store.save(&table).context("Failed to publish the price table")?;

    let records: Vec<BlockPrice> = table.iter().copied().collect();
    let export_path = store.export_path(export_format.extension());
    let writer = BufWriter::new(
        File::create(&export_path)
            .with_context(|| format!("Failed to create {}", export_path.display()))?,
    );
    write_export(export_format, &records, writer)
        .with_context(|| format!("Failed to write the {export_format} export"))?;

    if !quiet {
        let (min, max) = table.known_range().unwrap_or((0, 0));
        println!(
            "Published {} blocks ({min}..={max}) to {}",
            table.len(),
            store.table_path().display()
        );
        println!("Export written to {}", export_path.display());
    }

    Ok(())
}

/// Writes the published records in the chosen export format.
fn write_export<W: Write + Send>(
    format: OutputFormat,
    records: &[BlockPrice],
    writer: W,
) -> Result<(), FormatError> {
    match format {
        OutputFormat::Csv => CsvFormatter::new().write_prices(records, writer),
        OutputFormat::Json => JsonFormatter::new().write_prices(records, writer),
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_prices(records, writer),
    }
}

/// Resolves tick sources from explicit `exchange=path` flags, or by
/// discovering dumps in the data directory.
fn resolve_sources(sources: &[String], data_dir: &Path) -> Result<Vec<(Exchange, PathBuf)>> {
    if sources.is_empty() {
        let discovered = discover_sources(data_dir);
        if discovered.is_empty() {
            bail!(
                "No tick dumps found in {}; run `blockprice download` first \
                 or pass --source exchange=path",
                data_dir.display()
            );
        }
        return Ok(discovered);
    }

    sources
        .iter()
        .map(|spec| {
            let (exchange, path) = spec
                .split_once('=')
                .with_context(|| format!("Invalid source '{spec}', expected exchange=path"))?;
            let exchange: Exchange = exchange
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid source '{spec}': {e}"))?;
            Ok((exchange, PathBuf::from(path)))
        })
        .collect()
}

fn source_progress(quiet: bool, exchange: Exchange) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .expect("Invalid progress template"),
    );
    progress.set_message(format!("processing {exchange}"));
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<BlockPrice> {
        vec![
            BlockPrice {
                block_height: 700_001,
                opentime: 1_000.0,
                closetime: 2_000.0,
                open: 30_000.0,
                high: 30_500.0,
                low: 29_900.0,
                close: 30_250.0,
                volume: 12.5,
            },
            BlockPrice {
                block_height: 700_002,
                opentime: 2_000.0,
                closetime: 3_000.0,
                open: 30_250.0,
                high: 30_250.0,
                low: 30_250.0,
                close: 30_250.0,
                volume: 0.0,
            },
        ]
    }

    #[test]
    fn test_write_export_dispatches_on_format() {
        let records = sample_records();

        let mut csv = Vec::new();
        write_export(OutputFormat::Csv, &records, &mut csv).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("block_height,opentime,closetime,open,high,low,close,volume"));

        let mut json = Vec::new();
        write_export(OutputFormat::Json, &records, &mut json).unwrap();
        let json = String::from_utf8(json).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"block_height\":700001"));

        let mut ndjson = Vec::new();
        write_export(OutputFormat::Ndjson, &records, &mut ndjson).unwrap();
        let ndjson = String::from_utf8(ndjson).unwrap();
        assert_eq!(ndjson.lines().count(), 2);
    }

    #[test]
    fn test_export_format_round_trips_extension() {
        for format in OutputFormat::all() {
            assert_eq!(
                format.extension().parse::<OutputFormat>().unwrap(),
                *format
            );
        }
    }
}
