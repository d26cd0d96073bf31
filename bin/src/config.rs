//! Optional TOML configuration for the blockprice CLI.

use anyhow::{Context, Result, bail};
use blockprice_lib::{Endpoints, TableStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "blockprice.toml";

/// CLI configuration. Every field is optional; flags override file
/// values and built-in defaults fill the rest.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    endpoints: EndpointsSection,
    #[serde(default)]
    paths: PathsSection,
    #[serde(default)]
    aggregate: AggregateSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EndpointsSection {
    price_data_url: Option<String>,
    mempool_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PathsSection {
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AggregateSection {
    publish_lag: Option<u64>,
    priced_height_floor: Option<u64>,
}

impl Config {
    /// Loads the config from an explicit path, or from
    /// `./blockprice.toml` when present, or falls back to defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file '{}' does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse '{}'", path.display()))
    }

    /// Upstream endpoints, with built-in defaults for unset URLs.
    pub(crate) fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        match (
            self.endpoints.price_data_url.as_deref(),
            self.endpoints.mempool_url.as_deref(),
        ) {
            (None, None) => defaults,
            (price, mempool) => Endpoints::new(
                price.unwrap_or(blockprice_lib::DEFAULT_PRICE_DATA_URL),
                mempool.unwrap_or(blockprice_lib::DEFAULT_MEMPOOL_URL),
            ),
        }
    }

    /// The data directory: flag override, config value, or platform
    /// default, in that order.
    pub(crate) fn data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.paths.data_dir.clone())
            .unwrap_or_else(TableStore::default_path)
    }

    /// Publish lag: flag override, config value, or the library default.
    pub(crate) fn publish_lag(&self, flag: Option<u64>) -> Option<u64> {
        flag.or(self.aggregate.publish_lag)
    }

    /// Priced-height floor: flag override, config value, or the library
    /// default.
    pub(crate) fn priced_height_floor(&self, flag: Option<u64>) -> Option<u64> {
        flag.or(self.aggregate.priced_height_floor)
    }
}
