//! Atomic JSON persistence for the price table.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::PriceTable;

/// Errors that can occur while persisting or loading the table.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the data directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read the table file.
    #[error("Failed to read table '{path}': {source}")]
    ReadTable {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the table file.
    #[error("Failed to write table '{path}': {source}")]
    WriteTable {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to move the fully-written table into place.
    #[error("Failed to move '{from}' to '{to}': {source}")]
    Commit {
        /// The temporary file.
        from: PathBuf,
        /// The final table path.
        to: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The table file did not parse.
    #[error("Failed to parse table '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The table could not be serialized.
    #[error("Failed to serialize table: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// No table has been published yet.
    #[error("No price table found at '{0}'; run an aggregation first")]
    TableNotFound(PathBuf),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Reads and writes the published table under a base directory.
///
/// The table lives in a single `blockprice.json` file. Saves write to a
/// temp file in the same directory and rename it into place, so readers
/// either see the previous table or the complete new one, never a torso.
#[derive(Debug, Clone)]
pub struct TableStore {
    base_path: PathBuf,
}

impl TableStore {
    /// Creates a store rooted at the given directory, creating it if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| StoreError::CreateDir {
                path: base_path.clone(),
                source: e,
            })?;
        }
        Ok(Self { base_path })
    }

    /// Returns the default data directory.
    ///
    /// Uses the `directories` crate to find the platform location:
    /// - Linux: `~/.local/share/blockprice/`
    /// - macOS: `~/Library/Application Support/blockprice/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\blockprice\`
    ///
    /// Falls back to `~/.blockprice/` if the platform-specific location
    /// cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "blockprice").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.data_dir().to_path_buf()
        })
    }

    /// Creates a store at the default data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_default_path() -> Result<Self> {
        Self::new(Self::default_path())
    }

    /// The base directory this store works in.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the published JSON table.
    #[must_use]
    pub fn table_path(&self) -> PathBuf {
        self.base_path.join("blockprice.json")
    }

    /// Path of the flat export written alongside the table, named by the
    /// format's file extension.
    #[must_use]
    pub fn export_path(&self, extension: &str) -> PathBuf {
        self.base_path.join(format!("blockprice.{extension}"))
    }

    /// Saves the table atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the write, or the final rename
    /// fails.
    pub fn save(&self, table: &PriceTable) -> Result<()> {
        let path = self.table_path();
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string(table)?;
        fs::write(&tmp, json).map_err(|e| StoreError::WriteTable {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Commit {
            from: tmp,
            to: path.clone(),
            source: e,
        })?;

        debug!(path = %path.display(), records = table.len(), "saved price table");
        Ok(())
    }

    /// Loads the published table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if nothing was published yet,
    /// or an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<PriceTable> {
        let path = self.table_path();
        if !path.exists() {
            return Err(StoreError::TableNotFound(path));
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadTable {
            path: path.clone(),
            source: e,
        })?;
        let table = serde_json::from_str(&content).map_err(|e| StoreError::ParseJson {
            path: path.clone(),
            source: e,
        })?;

        debug!(path = %path.display(), "loaded price table");
        Ok(table)
    }
}

/// Fallback for determining the home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".blockprice")
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockprice_types::BlockPrice;
    use tempfile::TempDir;

    fn sample_table() -> PriceTable {
        PriceTable::from_records([
            BlockPrice {
                block_height: 100,
                opentime: 0.0,
                closetime: 1_000.0,
                open: 10.0,
                high: 12.0,
                low: 9.5,
                close: 11.0,
                volume: 4.25,
            },
            BlockPrice {
                block_height: 101,
                opentime: 1_000.0,
                closetime: 2_000.0,
                open: 11.0,
                high: 11.0,
                low: 11.0,
                close: 11.0,
                volume: 0.0,
            },
        ])
    }

    #[test]
    fn test_store_creates_base_dir() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("nested").join("data");
        let store = TableStore::new(base.clone()).unwrap();

        assert!(store.base_path().exists());
        assert_eq!(store.base_path(), base);
    }

    #[test]
    fn test_export_path_uses_extension() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::new(temp.path().to_path_buf()).unwrap();
        assert_eq!(
            store.export_path("ndjson"),
            temp.path().join("blockprice.ndjson")
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::new(temp.path().to_path_buf()).unwrap();

        let table = sample_table();
        store.save(&table).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.known_range(), Some((100, 101)));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::new(temp.path().to_path_buf()).unwrap();

        store.save(&sample_table()).unwrap();

        let names: Vec<String> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["blockprice.json".to_string()]);
    }

    #[test]
    fn test_load_without_table() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::new(temp.path().to_path_buf()).unwrap();

        assert!(matches!(store.load(), Err(StoreError::TableNotFound(_))));
    }

    #[test]
    fn test_load_rejects_corrupt_table() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::new(temp.path().to_path_buf()).unwrap();
        fs::write(store.table_path(), "{not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::ParseJson { .. })));
    }

    #[test]
    fn test_resave_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::new(temp.path().to_path_buf()).unwrap();

        store.save(&sample_table()).unwrap();
        let smaller = PriceTable::from_records([]);
        store.save(&smaller).unwrap();

        assert!(store.load().unwrap().is_empty());
    }
}
