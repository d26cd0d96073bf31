//! CSV output format.

use blockprice_types::BlockPrice;
use std::io::Write;

use crate::{FormatError, Formatter};

/// Canonical CSV header for the flat export.
pub(crate) const CSV_HEADER: &str = "block_height,opentime,closetime,open,high,low,close,volume";

/// CSV formatter.
///
/// Writes the canonical export: one record per line under the
/// `block_height,...,volume` header, prices in their shortest
/// round-trip form and volume fixed to 8 decimal places (one satoshi
/// of precision).
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with the header row enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_header: true,
        }
    }

    /// Sets whether to include the header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }
}

impl Formatter for CsvFormatter {
    fn write_prices<W: Write + Send>(
        &self,
        prices: &[BlockPrice],
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.include_header {
            writeln!(writer, "{CSV_HEADER}")?;
        }

        for price in prices {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{:.8}",
                price.block_height,
                price.opentime,
                price.closetime,
                price.open,
                price.high,
                price.low,
                price.close,
                price.volume
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_price() -> BlockPrice {
        BlockPrice {
            block_height: 734_241,
            opentime: 1_651_018_320.0,
            closetime: 1_651_018_956.0,
            open: 39_420.55,
            high: 39_510.0,
            low: 39_390.11,
            close: 39_461.02,
            volume: 12.345_678_91,
        }
    }

    #[test]
    fn test_csv_header_and_row() {
        let formatter = CsvFormatter::new();
        let mut output = Cursor::new(Vec::new());
        formatter.write_prices(&[sample_price()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let mut lines = result.lines();
        assert_eq!(
            lines.next().unwrap(),
            "block_height,opentime,closetime,open,high,low,close,volume"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("734241,1651018320,1651018956,39420.55,"));
        assert!(row.ends_with(",12.34567891"));
    }

    #[test]
    fn test_volume_fixed_to_eight_decimals() {
        let mut price = sample_price();
        price.volume = 1.5;
        let formatter = CsvFormatter::new().with_header(false);
        let mut output = Cursor::new(Vec::new());
        formatter.write_prices(&[price], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.trim_end().ends_with(",1.50000000"));
    }

    #[test]
    fn test_rows_roundtrip_within_tolerance() {
        let prices = vec![sample_price()];
        let formatter = CsvFormatter::new();
        let mut output = Cursor::new(Vec::new());
        formatter.write_prices(&prices, &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        for (line, original) in result.lines().skip(1).zip(&prices) {
            let fields: Vec<f64> = line.split(',').map(|f| f.parse().unwrap()).collect();
            assert_eq!(fields[0] as u64, original.block_height);
            assert!((fields[1] - original.opentime).abs() < 1e-9);
            assert!((fields[4] - original.high).abs() < 1e-9);
            assert!((fields[7] - original.volume).abs() < 5e-9);
        }
    }
}
