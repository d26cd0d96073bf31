//! Display utilities and output formatting for the blockprice CLI.
//!
//! All user-facing wording lives here; the library crates return typed
//! results and sentinels only.

use blockprice_lib::prelude::*;
use blockprice_lib::SATS_PER_BTC;
use chrono::{DateTime, Utc};

/// Formats a number with thousands separators and a fixed number of
/// decimal places.
pub(crate) fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (sign, rest) = formatted
        .strip_prefix('-')
        .map_or(("", formatted.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = rest.split_once('.').unwrap_or((rest, ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Formats an epoch-seconds timestamp as a human-readable UTC date.
pub(crate) fn format_timestamp(epoch_seconds: f64) -> String {
    DateTime::<Utc>::from_timestamp(epoch_seconds as i64, 0).map_or_else(
        || "unknown time".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// Renders a block's OHLCV record.
///
/// Prices above a dollar print as $/₿; sub-dollar prices print inverted
/// as ₿/$, which is how the earliest priced blocks are easiest to read.
pub(crate) fn format_block_price(price: &BlockPrice) -> String {
    let locked = format_timestamp(price.closetime);
    if price.close > 1.0 {
        format!(
            "BTC block price for block {}:\n\
             Locked on {locked}\n\
             Open:   {} $/₿\n\
             High:   {} $/₿\n\
             Low:    {} $/₿\n\
             Close:  {} $/₿\n\
             Volume: {} ₿",
            price.block_height,
            group_thousands(price.open, 2),
            group_thousands(price.high, 2),
            group_thousands(price.low, 2),
            group_thousands(price.close, 2),
            group_thousands(price.volume, 8),
        )
    } else if price.close == 0.0 {
        format!(
            "BTC block price for block {}:\n\
             Locked on {locked}\n\
             No pricing data yet (pre-market blocks)\n\
             Volume: {} ₿",
            price.block_height,
            group_thousands(price.volume, 8),
        )
    } else {
        format!(
            "BTC block price for block {}:\n\
             Locked on {locked}\n\
             Open:   {}\n\
             High:   {}\n\
             Low:    {}\n\
             Close:  {}\n\
             Volume: {} ₿",
            price.block_height,
            inverted(price.open),
            inverted(price.high),
            inverted(price.low),
            inverted(price.close),
            group_thousands(price.volume, 8),
        )
    }
}

/// Inverts a sub-dollar price component for ₿/$ display. Ancient records
/// can carry a zero component next to a nonzero close; those print as
/// missing rather than as an infinite inversion.
fn inverted(component: f64) -> String {
    if component == 0.0 {
        "no data".to_string()
    } else {
        format!("{} ₿/$", group_thousands(1.0 / component, 8))
    }
}

/// Renders a sats-per-dollar quote.
pub(crate) fn format_sats_quote(quote: Quote) -> String {
    match quote {
        Quote::Value(sats) => format!("{} 丰/$", group_thousands(sats, 0)),
        Quote::Unbounded => "Infinite! 丰/$ (before ₿itcoin pricing data).".to_string(),
        Quote::Undefined => "No data for that block.".to_string(),
    }
}

/// Renders a USD-value quote.
pub(crate) fn format_usd_quote(quote: Quote) -> String {
    match quote {
        Quote::Value(usd) => format!("${}", group_thousands(usd, 2)),
        Quote::Unbounded => "Worthless in dollars (before ₿itcoin pricing data).".to_string(),
        Quote::Undefined => "No data for that block.".to_string(),
    }
}

/// Renders a BTC-value quote, in sats below one whole coin.
pub(crate) fn format_btc_quote(quote: Quote) -> String {
    match quote {
        Quote::Value(btc) if btc > 1.0 => format!("{} ₿", group_thousands(btc, 8)),
        Quote::Value(btc) => {
            let sats = btc * SATS_PER_BTC;
            format!("{} 丰", group_thousands(sats, 0))
        }
        Quote::Unbounded => "Infinite! 丰/$ (before ₿itcoin pricing data).".to_string(),
        Quote::Undefined => "No data for that block.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1_000.0, 0), "1,000");
        assert_eq!(group_thousands(-4_500.5, 2), "-4,500.50");
        assert_eq!(group_thousands(0.12345678, 8), "0.12345678");
    }

    #[test]
    fn test_format_block_price_modes() {
        let mut price = BlockPrice {
            block_height: 734_241,
            opentime: 1_651_018_320.0,
            closetime: 1_651_018_956.0,
            open: 39_420.55,
            high: 39_510.0,
            low: 39_390.11,
            close: 39_461.02,
            volume: 12.5,
        };
        let text = format_block_price(&price);
        assert!(text.contains("39,461.02 $/₿"));

        price.open = 0.5;
        price.high = 0.5;
        price.low = 0.5;
        price.close = 0.5;
        let text = format_block_price(&price);
        assert!(text.contains("2.00000000 ₿/$"));

        price.close = 0.0;
        let text = format_block_price(&price);
        assert!(text.contains("No pricing data yet"));
    }

    #[test]
    fn test_inverted_rendering_skips_zero_components() {
        let price = BlockPrice {
            block_height: 68_000,
            opentime: 1_280_000_000.0,
            closetime: 1_280_000_600.0,
            open: 0.06,
            high: 0.07,
            low: 0.0,
            close: 0.065,
            volume: 100.0,
        };
        let text = format_block_price(&price);
        assert!(text.contains("Low:    no data"));
        assert!(!text.contains("inf"));
        assert!(text.contains("₿/$"));
    }

    #[test]
    fn test_quote_rendering() {
        assert_eq!(format_sats_quote(Quote::Value(5_000.0)), "5,000 丰/$");
        assert!(format_sats_quote(Quote::Unbounded).contains("Infinite"));
        assert_eq!(format_usd_quote(Quote::Value(10_000.0)), "$10,000.00");
        assert_eq!(format_btc_quote(Quote::Value(0.5)), "50,000,000 丰");
        assert_eq!(format_btc_quote(Quote::Value(2.5)), "2.50000000 ₿");
    }
}
