//! Sync-timestamps command implementation.
//!
//! Appends new `height,timestamp` lines to the boundary file from the
//! block API, stopping a reorg margin below the chain tip.

use anyhow::{Context, Result, bail};
use blockprice_lib::prelude::*;
use blockprice_lib::REORG_MARGIN;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;

pub(crate) async fn sync_timestamps(
    config: &Config,
    timestamps: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let data_dir = config.data_dir(data_dir);
    let timestamps = timestamps.unwrap_or_else(|| data_dir.join("timestamps.txt"));

    let boundaries = read_boundaries(&timestamps).with_context(|| {
        format!(
            "Failed to read {}; the sync extends an existing boundary file",
            timestamps.display()
        )
    })?;
    let Some(our_tip) = boundaries.last().map(|b| b.height) else {
        bail!(
            "{} is empty; seed it with at least one height,timestamp line",
            timestamps.display()
        );
    };

    let client = DownloadClient::with_defaults().context("Failed to create HTTP client")?;
    let endpoints = config.endpoints();

    let chain_tip = fetch_tip_height(&client, &endpoints)
        .await
        .context("Failed to fetch the chain tip height")?;
    let target = chain_tip.saturating_sub(REORG_MARGIN);

    if our_tip >= target {
        if !quiet {
            println!(
                "Already up to date: have block {our_tip}, chain tip {chain_tip} \
                 (syncing stops {REORG_MARGIN} blocks behind)"
            );
        }
        return Ok(());
    }

    let missing = target - our_tip;
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(missing);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} blocks",
                )
                .expect("Invalid progress template")
                .progress_chars("=>-"),
        );
        pb
    };

    let mut file = OpenOptions::new()
        .append(true)
        .open(&timestamps)
        .with_context(|| format!("Failed to open {} for append", timestamps.display()))?;

    // The stream yields stamps in height order, so each one can go
    // straight to the file; a failure aborts with the file still valid.
    let mut stamps = std::pin::pin!(stamp_stream(&client, &endpoints, our_tip + 1..=target));
    while let Some(stamp) = stamps.next().await {
        let stamp = stamp.context("Failed to fetch a block timestamp")?;
        writeln!(file, "{}", stamp.as_boundary_line())
            .with_context(|| format!("Failed to append to {}", timestamps.display()))?;
        progress.inc(1);
    }

    progress.finish_and_clear();
    if !quiet {
        println!("Appended {missing} blocks; boundary file now ends at block {target}");
    }

    Ok(())
}
