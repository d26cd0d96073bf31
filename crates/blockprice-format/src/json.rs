//! JSON output format.

use blockprice_types::BlockPrice;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_prices<W: Write + Send>(
        &self,
        prices: &[BlockPrice],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, prices)?;
                } else {
                    serde_json::to_writer(&mut writer, prices)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for price in prices {
                    serde_json::to_writer(&mut writer, price)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_price() -> BlockPrice {
        BlockPrice {
            block_height: 700_001,
            opentime: 1_000.0,
            closetime: 2_000.0,
            open: 30_000.0,
            high: 30_500.0,
            low: 29_900.0,
            close: 30_250.0,
            volume: 12.5,
        }
    }

    #[test]
    fn test_json_array() {
        let formatter = JsonFormatter::new();
        let mut output = Cursor::new(Vec::new());
        formatter.write_prices(&[sample_price()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.starts_with('['));
        assert!(result.contains("\"block_height\":700001"));
        assert!(result.contains("\"close\":30250.0"));
    }

    #[test]
    fn test_ndjson_one_record_per_line() {
        let formatter = JsonFormatter::ndjson();
        let mut output = Cursor::new(Vec::new());
        formatter
            .write_prices(&[sample_price(), sample_price()], &mut output)
            .unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('{'));

        let back: BlockPrice = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(back, sample_price());
    }

    #[test]
    fn test_pretty_json() {
        let formatter = JsonFormatter::new().with_pretty(true);
        let mut output = Cursor::new(Vec::new());
        formatter.write_prices(&[sample_price()], &mut output).unwrap();

        let result = String::from_utf8(output.into_inner()).unwrap();
        assert!(result.contains("  ")); // indentation
    }
}
