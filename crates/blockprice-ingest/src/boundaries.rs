//! Block boundary file parsing.

use blockprice_types::BlockBoundary;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::IngestError;

/// Reads a boundary file of `height,timestamp` lines.
///
/// Blank lines are ignored (the sync command appends with a trailing
/// newline); anything else that does not parse is an error carrying the
/// line number. The sequence itself is validated later, when the
/// aggregator is built from it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is malformed.
pub fn read_boundaries(path: impl AsRef<Path>) -> crate::Result<Vec<BlockBoundary>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| IngestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut boundaries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = line.split_once(',').and_then(|(height, timestamp)| {
            let height = height.trim().parse::<u64>().ok()?;
            let timestamp = timestamp.trim().parse::<f64>().ok()?;
            Some(BlockBoundary::new(height, timestamp))
        });
        match parsed {
            Some(boundary) => boundaries.push(boundary),
            None => {
                return Err(IngestError::Boundary {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    text: line.to_string(),
                });
            }
        }
    }

    debug!(path = %path.display(), count = boundaries.len(), "read block boundaries");
    Ok(boundaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_boundaries() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,1231469665").unwrap();
        writeln!(file, "2,1231469744").unwrap();
        writeln!(file, "3,1231470173").unwrap();

        let boundaries = read_boundaries(file.path()).unwrap();
        assert_eq!(boundaries.len(), 3);
        assert_eq!(boundaries[0].height, 1);
        assert!((boundaries[2].timestamp - 1_231_470_173.0).abs() < 1e-6);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,1231469665").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "2,1231469744").unwrap();

        let boundaries = read_boundaries(file.path()).unwrap();
        assert_eq!(boundaries.len(), 2);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,1231469665").unwrap();
        writeln!(file, "not-a-boundary").unwrap();

        let err = read_boundaries(file.path()).unwrap_err();
        assert!(matches!(err, IngestError::Boundary { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = read_boundaries("/nonexistent/timestamps.txt").unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }
}
