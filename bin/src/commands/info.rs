//! Info command implementation.

use anyhow::{Context, Result};
use blockprice_lib::prelude::*;
use chrono::{DateTime, Utc};
use indicatif::HumanBytes;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::display;

pub(crate) fn info(config: &Config, data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = config.data_dir(data_dir);
    let store = TableStore::new(data_dir).context("Failed to open the data directory")?;
    let table = store.load()?;

    let path = store.table_path();
    println!("Price table: {}", path.display());

    if let Ok(meta) = fs::metadata(&path) {
        println!("Size:        {}", HumanBytes(meta.len()));
        if let Ok(modified) = meta.modified() {
            let when: DateTime<Utc> = modified.into();
            println!("Written:     {}", when.format("%Y-%m-%d %H:%M:%S UTC"));
        }
    }

    println!("Records:     {}", table.len());
    if let Some((min, max)) = table.known_range() {
        println!("Blocks:      {min}..={max}");
    }
    if let Some(latest) = table.latest() {
        println!(
            "Latest:      block {} closed {} at {} $/₿",
            latest.block_height,
            display::format_timestamp(latest.closetime),
            display::group_thousands(latest.close, 2),
        );
    }

    Ok(())
}
