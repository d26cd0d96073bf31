//! Query command implementation.

use anyhow::{Context, Result};
use blockprice_lib::prelude::*;

use crate::QueryAction;
use crate::config::Config;
use crate::display;

pub(crate) fn query(config: &Config, action: &QueryAction) -> Result<()> {
    let store =
        TableStore::new(config.data_dir(None)).context("Failed to open the data directory")?;
    let table = store.load().context("Failed to load the price table")?;
    let service = QueryService::new(&table);

    match *action {
        QueryAction::Block { height } => match service.price_at(height) {
            Ok(price) => println!("{}", display::format_block_price(price)),
            Err(e) => println!("{e}"),
        },
        QueryAction::Sats { height } => match service.sats_per_usd(height) {
            Quote::Undefined => println!("{}", lookup_failure(&service, height)),
            quote => println!("{}", display::format_sats_quote(quote)),
        },
        QueryAction::Usd { height, btc } => match service.usd_value(height, btc) {
            Quote::Undefined => println!("{}", lookup_failure(&service, height)),
            quote => println!(
                "{} ₿ at block {height} was {}",
                display::group_thousands(btc, 8),
                display::format_usd_quote(quote)
            ),
        },
        QueryAction::Btc { height, usd } => match service.btc_value(height, usd) {
            Quote::Undefined => println!("{}", lookup_failure(&service, height)),
            quote => println!(
                "${} at block {height} was {}",
                display::group_thousands(usd, 2),
                display::format_btc_quote(quote)
            ),
        },
        QueryAction::Range => match service.known_range() {
            Some((min, max)) => {
                // The closetime of the newest block dates the table.
                let latest = table.latest().map_or_else(String::new, |price| {
                    format!(" (locked on {})", display::format_timestamp(price.closetime))
                });
                println!("Published blocks: {min} through {max}{latest}");
            }
            None => println!("The price table is empty; run an aggregation first."),
        },
    }

    Ok(())
}

/// Words an undefined quote using the table's own distinction between
/// "too recent" and "not priced".
fn lookup_failure(service: &QueryService<'_>, height: u64) -> String {
    match service.price_at(height) {
        Err(e) => e.to_string(),
        // Unreachable for an undefined quote, but keep the wording sane.
        Ok(_) => format!("No data for block {height}."),
    }
}
