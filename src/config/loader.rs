// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Read and deserialize a graph description without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), units = config.unit.len(), "read graph description");

    Ok(config)
}

/// Read a graph description and validate it.
///
/// Checks for:
/// - at least one unit,
/// - unknown or self `after` references,
/// - spans that end before they start,
/// - dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Trackline.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Trackline.toml")
}
