//! Gzip unpacking for downloaded dumps.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// Gunzips `src` into `dst`, returning the decompressed byte count.
///
/// Dumps run to gigabytes, so this copies in streaming fashion rather
/// than buffering the whole file. Call it from `spawn_blocking` in async
/// contexts.
///
/// # Errors
///
/// Returns an error if either file cannot be opened or the copy fails
/// (including corrupt gzip data).
pub fn gunzip_file(src: &Path, dst: &Path) -> io::Result<u64> {
    let reader = GzDecoder::new(BufReader::new(File::open(src)?));
    let mut reader = BufReader::new(reader);
    let mut writer = BufWriter::new(File::create(dst)?);
    io::copy(&mut reader, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_gunzip_roundtrip() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("dump.csv.gz");
        let dst = dir.path().join("dump.csv");

        let payload = "1500000000,30000.5,0.25\n";
        let mut encoder = GzEncoder::new(File::create(&src).unwrap(), Compression::default());
        encoder.write_all(payload.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let bytes = gunzip_file(&src, &dst).unwrap();
        assert_eq!(bytes, payload.len() as u64);
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), payload);
    }

    #[test]
    fn test_gunzip_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("garbage.gz");
        let dst = dir.path().join("out.csv");
        std::fs::write(&src, b"not gzip at all").unwrap();

        assert!(gunzip_file(&src, &dst).is_err());
    }
}
