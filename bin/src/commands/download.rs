//! Download command implementation.
//!
//! Fetches full-history exchange dumps and unpacks them into the data
//! directory, ready for aggregation.

use anyhow::{Context, Result, bail};
use blockprice_lib::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;

pub(crate) async fn download(
    config: &Config,
    exchanges: &[String],
    data_dir: Option<PathBuf>,
    yes: bool,
    quiet: bool,
) -> Result<()> {
    let exchanges = resolve_exchanges(exchanges)?;
    let data_dir = config.data_dir(data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    if !yes {
        let names: Vec<&str> = exchanges.iter().map(Exchange::id).collect();
        let confirmed = inquire::Confirm::new(&format!(
            "Download full-history dumps for {}? This fetches several GB.",
            names.join(", ")
        ))
        .with_default(false)
        .prompt()
        .context("Confirmation prompt failed")?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let client = DownloadClient::with_defaults().context("Failed to create HTTP client")?;
    let endpoints = config.endpoints();

    for exchange in exchanges {
        let progress = byte_progress(quiet, exchange);

        let result = download_dump(&client, &endpoints, exchange, &data_dir, |bytes| {
            progress.inc(bytes);
        })
        .await
        .with_context(|| format!("Failed to download the {exchange} dump"))?;

        progress.finish_and_clear();
        if !quiet {
            println!(
                "{}: {} compressed -> {} unpacked at {}",
                exchange,
                indicatif::HumanBytes(result.compressed_bytes),
                indicatif::HumanBytes(result.decompressed_bytes),
                result.csv_path.display()
            );
        }
    }

    Ok(())
}

fn resolve_exchanges(names: &[String]) -> Result<Vec<Exchange>> {
    if names.is_empty() {
        return Ok(Exchange::all().to_vec());
    }
    let mut exchanges = names
        .iter()
        .map(|name| {
            name.parse::<Exchange>()
                .map_err(|e| anyhow::anyhow!("{e}"))
        })
        .collect::<Result<Vec<Exchange>>>()?;
    exchanges.sort_unstable();
    exchanges.dedup();
    if exchanges.is_empty() {
        bail!("No exchanges to download");
    }
    Ok(exchanges)
}

fn byte_progress(quiet: bool, exchange: Exchange) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    // Dump sizes are unknown up front, so this counts bytes rather than
    // rendering a bar.
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
            .expect("Invalid progress template"),
    );
    progress.set_message(format!("downloading {exchange}"));
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}
